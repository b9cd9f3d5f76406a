//! Batch import: dedup partitioning against pre-fetched key sets, then one
//! top-level transaction with a savepoint wrapping each person's whole group
//! (person + faculty + qualifications). A bad row rolls back its own group
//! and the import keeps going; only setup failures abort the run.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use rusqlite::{params, Connection, Savepoint, Transaction};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cipher::CnicCipher;
use crate::error::ImportError;
use crate::extract::{
    extract_designations, extract_faculties, extract_persons, extract_qualifications,
    DesignationKind, FacultyDraft, PersonDraft, QualificationDraft, RowDefaults,
    RowDesignations,
};
use crate::tabular;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    Committed,
    PartiallyCommitted,
}

impl ImportOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportOutcome::Committed => "committed",
            ImportOutcome::PartiallyCommitted => "partially_committed",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEntry {
    /// 1-based data-row index (header row excluded).
    pub row: usize,
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub import_id: String,
    pub outcome: ImportOutcome,
    pub processed: usize,
    pub skipped: usize,
    pub total: usize,
    pub skipped_entries: Vec<SkippedEntry>,
    pub defaulted_fields: Vec<RowDefaults>,
}

/// Unique-key sets loaded before any write. Accepted rows are merged in
/// incrementally so two rows in one file cannot claim the same key.
#[derive(Default)]
struct ExistingKeys {
    cnic_digests: HashSet<String>,
    faculty_codes: HashSet<i64>,
    university_emails: HashSet<String>,
    designations: HashMap<(String, DesignationKind), i64>,
    qualifications: HashSet<(i64, String)>,
}

fn load_existing_keys(conn: &Connection) -> Result<ExistingKeys, rusqlite::Error> {
    let mut keys = ExistingKeys::default();

    let mut stmt =
        conn.prepare("SELECT cnic_digest FROM person WHERE cnic_digest IS NOT NULL")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        keys.cnic_digests.insert(row.get(0)?);
    }

    let mut stmt = conn.prepare("SELECT code FROM faculty")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        keys.faculty_codes.insert(row.get(0)?);
    }

    let mut stmt =
        conn.prepare("SELECT university_email FROM faculty WHERE university_email IS NOT NULL")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        keys.university_emails.insert(row.get(0)?);
    }

    let mut stmt = conn.prepare("SELECT id, title, type FROM designation")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let title: String = row.get(1)?;
        let kind: String = row.get(2)?;
        let kind = match kind.as_str() {
            "academic" => DesignationKind::Academic,
            "administrative" => DesignationKind::Administrative,
            _ => continue,
        };
        keys.designations.insert((title, kind), id);
    }

    let mut stmt = conn.prepare("SELECT person_id, title FROM qualification")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        keys.qualifications.insert((row.get(0)?, row.get(1)?));
    }

    Ok(keys)
}

pub fn run_import(
    conn: &Connection,
    cipher: &CnicCipher,
    path: &Path,
) -> Result<ImportReport, ImportError> {
    let import_id = Uuid::new_v4().to_string();
    let started_at = chrono::Utc::now().to_rfc3339();

    let table = tabular::read_table(path)?;
    info!(file = %path.display(), rows = table.rows.len(), "loaded source table");

    let (persons, person_defaults) = extract_persons(&table)?;
    let (faculties, faculty_defaults) = extract_faculties(&table)?;
    let designations = extract_designations(&table);
    let qualifications = extract_qualifications(&table);
    info!(
        persons = persons.len(),
        qualifications = qualifications.len(),
        "extracted entity drafts"
    );

    let mut quals_by_row: HashMap<usize, Vec<&QualificationDraft>> = HashMap::new();
    for q in &qualifications {
        quals_by_row.entry(q.row).or_default().push(q);
    }

    // Fatal on failure: nothing has been written yet and dedup cannot run
    // without the key sets.
    let mut keys = load_existing_keys(conn)?;

    let mut tx = conn.unchecked_transaction()?;

    let total = table.rows.len();
    let mut processed = 0usize;
    let mut skipped_entries: Vec<SkippedEntry> = Vec::new();
    let no_designations = RowDesignations::default();

    for (idx, (person, faculty)) in persons.iter().zip(faculties.iter()).enumerate() {
        let row_no = idx + 1;
        let key = row_key(person, faculty);

        let Some(cnic) = person.cnic.as_deref() else {
            info!(row = row_no, "row has no usable CNIC; skipping");
            skipped_entries.push(SkippedEntry {
                row: row_no,
                key,
                reason: "missing CNIC".to_string(),
            });
            continue;
        };
        let digest = CnicCipher::digest(cnic);
        if keys.cnic_digests.contains(&digest) {
            info!(row = row_no, "duplicate CNIC; skipping");
            skipped_entries.push(SkippedEntry {
                row: row_no,
                key,
                reason: "duplicate CNIC".to_string(),
            });
            continue;
        }
        if let Some(code) = faculty.code {
            if keys.faculty_codes.contains(&code) {
                info!(row = row_no, code, "duplicate faculty code; skipping");
                skipped_entries.push(SkippedEntry {
                    row: row_no,
                    key,
                    reason: "duplicate faculty code".to_string(),
                });
                continue;
            }
        }
        if let Some(email) = faculty.university_email.as_deref() {
            if keys.university_emails.contains(email) {
                info!(row = row_no, email, "duplicate university email; skipping");
                skipped_entries.push(SkippedEntry {
                    row: row_no,
                    key,
                    reason: "duplicate university email".to_string(),
                });
                continue;
            }
        }

        let row_designations = designations.get(idx).unwrap_or(&no_designations);
        let row_quals = quals_by_row
            .get(&row_no)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        match stage_person_group(
            &mut tx,
            cipher,
            &keys,
            person,
            faculty,
            row_designations,
            row_quals,
            &digest,
        ) {
            Ok(staged) => {
                keys.cnic_digests.insert(staged.digest);
                keys.faculty_codes.insert(staged.code);
                if let Some(email) = staged.email {
                    keys.university_emails.insert(email);
                }
                for (desig_key, id) in staged.new_designations {
                    keys.designations.insert(desig_key, id);
                }
                for pair in staged.qual_pairs {
                    keys.qualifications.insert(pair);
                }
                processed += 1;
            }
            Err(StageError::Duplicate(detail)) => {
                // Expected at scale (e.g. re-importing a partially imported
                // file); the group is already rolled back.
                info!(row = row_no, %detail, "constraint violation; person group rolled back");
                skipped_entries.push(SkippedEntry {
                    row: row_no,
                    key,
                    reason: format!("duplicate key: {detail}"),
                });
            }
            Err(StageError::Other(detail)) => {
                // An input shape the pipeline did not anticipate.
                warn!(row = row_no, %detail, "unexpected row failure; person group rolled back");
                skipped_entries.push(SkippedEntry {
                    row: row_no,
                    key,
                    reason: format!("row failed: {detail}"),
                });
            }
        }
    }

    tx.commit().map_err(|e| ImportError::Commit(e.to_string()))?;

    let skipped = skipped_entries.len();
    let outcome = if skipped == 0 {
        ImportOutcome::Committed
    } else {
        ImportOutcome::PartiallyCommitted
    };
    let report = ImportReport {
        import_id,
        outcome,
        processed,
        skipped,
        total,
        skipped_entries,
        defaulted_fields: merge_defaults(person_defaults, faculty_defaults),
    };
    info!(processed, skipped, total, "import finished");

    // Audit trail is best-effort; the import itself has already committed.
    if let Err(e) = record_audit(conn, path, &started_at, &report) {
        warn!(error = %e, "failed to record import audit row");
    }

    Ok(report)
}

fn row_key(person: &PersonDraft, faculty: &FacultyDraft) -> String {
    match faculty.code {
        Some(code) => code.to_string(),
        None => format!("{} {}", person.first_name, person.last_name),
    }
}

fn merge_defaults(person: Vec<RowDefaults>, faculty: Vec<RowDefaults>) -> Vec<RowDefaults> {
    let mut by_row: BTreeMap<usize, Vec<&'static str>> = BTreeMap::new();
    for d in person.into_iter().chain(faculty) {
        by_row.entry(d.row).or_default().extend(d.fields);
    }
    by_row
        .into_iter()
        .map(|(row, fields)| RowDefaults { row, fields })
        .collect()
}

/// Keys claimed by one accepted person group, merged into the staged sets
/// only after its savepoint commits. A rolled-back group leaves no trace,
/// including any designation rows it created.
struct StagedRow {
    digest: String,
    code: i64,
    email: Option<String>,
    new_designations: Vec<((String, DesignationKind), i64)>,
    qual_pairs: Vec<(i64, String)>,
}

enum StageError {
    Duplicate(String),
    Other(String),
}

fn classify(e: rusqlite::Error) -> StageError {
    match e.sqlite_error_code() {
        Some(rusqlite::ErrorCode::ConstraintViolation) => StageError::Duplicate(e.to_string()),
        _ => StageError::Other(e.to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
fn stage_person_group(
    tx: &mut Transaction,
    cipher: &CnicCipher,
    keys: &ExistingKeys,
    person: &PersonDraft,
    faculty: &FacultyDraft,
    designations: &RowDesignations,
    quals: &[&QualificationDraft],
    digest: &str,
) -> Result<StagedRow, StageError> {
    let mut sp = tx.savepoint().map_err(classify)?;
    match insert_group(&sp, cipher, keys, person, faculty, designations, quals, digest) {
        Ok(staged) => {
            sp.commit().map_err(classify)?;
            Ok(staged)
        }
        Err(e) => {
            let _ = sp.rollback();
            Err(classify(e))
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn insert_group(
    sp: &Savepoint,
    cipher: &CnicCipher,
    keys: &ExistingKeys,
    person: &PersonDraft,
    faculty: &FacultyDraft,
    designations: &RowDesignations,
    quals: &[&QualificationDraft],
    digest: &str,
) -> Result<StagedRow, rusqlite::Error> {
    sp.execute(
        "INSERT INTO person(first_name, last_name, father_husband_name, sex, dob, cnic,
                            cnic_digest, cnic_expiry, phone, email, blood_group,
                            marital_status, date_of_marriage, no_of_dependents)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            person.first_name,
            person.last_name,
            person.father_husband_name,
            person.sex,
            person.dob.map(|d| d.to_string()),
            person.cnic.as_deref().map(|c| cipher.protect(c)),
            digest,
            person.cnic_expiry.map(|d| d.to_string()),
            person.phone,
            person.email,
            person.blood_group,
            person.marital_status,
            person.date_of_marriage.map(|d| d.to_string()),
            person.no_of_dependents,
        ],
    )?;
    let person_id = sp.last_insert_rowid();

    // Designations flush before the faculty row so the referenced id exists;
    // a pair already staged earlier in the batch is reused, never duplicated.
    let mut new_designations = Vec::new();
    let mut academic_id: Option<i64> = None;
    for (title, kind) in [
        (designations.academic.as_ref(), DesignationKind::Academic),
        (
            designations.administrative.as_ref(),
            DesignationKind::Administrative,
        ),
    ] {
        let Some(title) = title else { continue };
        let desig_key = (title.clone(), kind);
        let id = match keys.designations.get(&desig_key) {
            Some(&id) => id,
            None => {
                sp.execute(
                    "INSERT INTO designation(title, type) VALUES(?, ?)",
                    params![title, kind.as_str()],
                )?;
                let id = sp.last_insert_rowid();
                new_designations.push((desig_key, id));
                id
            }
        };
        if kind == DesignationKind::Academic {
            academic_id = Some(id);
        }
    }

    let code = faculty.code.unwrap_or(person_id);
    sp.execute(
        "INSERT INTO faculty(code, title, university_email, designation_id, status,
                             person_id, date_of_joining)
         VALUES(?, ?, ?, ?, ?, ?, ?)",
        params![
            code,
            faculty.title,
            faculty.university_email,
            academic_id,
            faculty.status,
            person_id,
            faculty.date_of_joining,
        ],
    )?;

    // (person_id, title) uniqueness is application-level: storage pairs plus
    // repeats across this row's own column groups.
    let mut qual_pairs = Vec::new();
    let mut seen_titles: HashSet<&str> = HashSet::new();
    for q in quals {
        if keys.qualifications.contains(&(person_id, q.title.clone())) {
            continue;
        }
        if !seen_titles.insert(q.title.as_str()) {
            continue;
        }
        sp.execute(
            "INSERT INTO qualification(person_id, category, title, institution, country, year)
             VALUES(?, ?, ?, ?, ?, ?)",
            params![
                person_id,
                q.category,
                q.title,
                q.institution,
                q.country,
                q.year
            ],
        )?;
        qual_pairs.push((person_id, q.title.clone()));
    }

    Ok(StagedRow {
        digest: digest.to_string(),
        code,
        email: faculty.university_email.clone(),
        new_designations,
        qual_pairs,
    })
}

fn record_audit(
    conn: &Connection,
    path: &Path,
    started_at: &str,
    report: &ImportReport,
) -> Result<(), rusqlite::Error> {
    let finished_at = chrono::Utc::now().to_rfc3339();
    let payload = serde_json::to_string(report).unwrap_or_default();
    conn.execute(
        "INSERT INTO import_audit(import_id, source_file, started_at, finished_at,
                                  outcome, processed, skipped, total, report)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            report.import_id,
            path.to_string_lossy().to_string(),
            started_at,
            finished_at,
            report.outcome.as_str(),
            report.processed as i64,
            report.skipped as i64,
            report.total as i64,
            payload,
        ],
    )?;
    Ok(())
}
