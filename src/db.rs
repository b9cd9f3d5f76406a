use rusqlite::Connection;
use std::path::Path;

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("faculty.sqlite3");
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// In-memory database with the full schema, for tests.
pub fn open_in_memory() -> anyhow::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS person(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            father_husband_name TEXT,
            sex TEXT NOT NULL,
            dob TEXT,
            cnic TEXT,
            cnic_digest TEXT,
            cnic_expiry TEXT,
            phone TEXT,
            email TEXT,
            blood_group TEXT,
            marital_status TEXT,
            date_of_marriage TEXT,
            no_of_dependents INTEGER
        )",
        [],
    )?;

    // Workspaces created before encryption-at-rest lack the digest column.
    ensure_person_cnic_digest(conn)?;
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_person_cnic_digest
         ON person(cnic_digest)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS designation(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            type TEXT NOT NULL,
            UNIQUE(title, type)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS faculty(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code INTEGER NOT NULL UNIQUE,
            title TEXT NOT NULL,
            university_email TEXT UNIQUE,
            designation_id INTEGER,
            status TEXT NOT NULL,
            person_id INTEGER NOT NULL,
            date_of_joining TEXT NOT NULL,
            FOREIGN KEY(designation_id) REFERENCES designation(id) ON DELETE SET NULL,
            FOREIGN KEY(person_id) REFERENCES person(id) ON DELETE CASCADE
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_faculty_person ON faculty(person_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_faculty_designation ON faculty(designation_id)",
        [],
    )?;

    // (person_id, title) uniqueness is application-enforced by the import
    // orchestrator, not a constraint.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS qualification(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            person_id INTEGER NOT NULL,
            category TEXT NOT NULL,
            title TEXT NOT NULL,
            institution TEXT,
            country TEXT,
            year INTEGER,
            FOREIGN KEY(person_id) REFERENCES person(id) ON DELETE CASCADE
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_qualification_person ON qualification(person_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS import_audit(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            import_id TEXT NOT NULL,
            source_file TEXT NOT NULL,
            started_at TEXT NOT NULL,
            finished_at TEXT,
            outcome TEXT NOT NULL,
            processed INTEGER NOT NULL,
            skipped INTEGER NOT NULL,
            total INTEGER NOT NULL,
            report TEXT
        )",
        [],
    )?;

    Ok(())
}

fn ensure_person_cnic_digest(conn: &Connection) -> anyhow::Result<()> {
    if table_has_column(conn, "person", "cnic_digest")? {
        return Ok(());
    }
    conn.execute("ALTER TABLE person ADD COLUMN cnic_digest TEXT", [])?;
    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
