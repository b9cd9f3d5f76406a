mod test_support;

use facultyd::cipher::CnicCipher;
use facultyd::db;
use facultyd::import::{run_import, ImportOutcome};
use test_support::{temp_dir, write_fixture, FIXTURE_HEADER};

fn clean_rows() -> String {
    format!(
        "{FIXTURE_HEADER}\n\
Ali,Khan,Male,35202-1111111-1,ali.khan@uni.edu,05/03/1990,101,Professor,Active,2015-08-01,Professor,,PhD Computer Science,UMT,Pakistan,2010,MSc Computer Science,PU,Pakistan,2006\n\
Omar,Shah,Male,35202-2222222-2,omar.shah@uni.edu,1985-11-30,103,Associate Professor,Active,2012-09-01,Associate Professor,Registrar,PhD Physics,LUMS,Pakistan,2011,,,,\n"
    )
}

#[test]
fn whitespace_duplicate_cnic_within_one_file() {
    let ws = temp_dir("facultyd-dedup");
    let conn = db::open_db(&ws).expect("open db");
    let cipher = CnicCipher::from_key(None).expect("cipher");

    // Row 2 repeats row 1's CNIC with surrounding whitespace.
    let csv = format!(
        "{FIXTURE_HEADER}\n\
Ali,Khan,Male,35202-1111111-1,ali.khan@uni.edu,05/03/1990,101,Professor,Active,2015-08-01,Professor,,PhD Computer Science,UMT,Pakistan,2010,,,,\n\
Sara,Bibi,Female, 35202-1111111-1 ,sara.bibi@uni.edu,12/07/1988,102,Lecturer,Active,2018-01-15,Lecturer,,MPhil Chemistry,GCU,Pakistan,2012,,,,\n\
Omar,Shah,Male,35202-2222222-2,omar.shah@uni.edu,1985-11-30,103,Associate Professor,Active,2012-09-01,Associate Professor,,PhD Physics,LUMS,Pakistan,2011,,,,\n"
    );
    let path = write_fixture(&ws, "staff.csv", &csv);

    let report = run_import(&conn, &cipher, &path).expect("import");
    assert_eq!(report.total, 3);
    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.outcome, ImportOutcome::PartiallyCommitted);
    assert_eq!(report.skipped_entries.len(), 1);
    assert_eq!(report.skipped_entries[0].row, 2);
    assert_eq!(report.skipped_entries[0].key, "102");
    assert_eq!(report.skipped_entries[0].reason, "duplicate CNIC");

    let persons: i64 = conn
        .query_row("SELECT COUNT(*) FROM person", [], |r| r.get(0))
        .expect("count persons");
    assert_eq!(persons, 2);
    let faculty: i64 = conn
        .query_row("SELECT COUNT(*) FROM faculty", [], |r| r.get(0))
        .expect("count faculty");
    assert_eq!(faculty, 2);

    // Day-first date policy lands Ali's DoB on 5 March.
    let dob: String = conn
        .query_row(
            "SELECT dob FROM person WHERE first_name = 'Ali'",
            [],
            |r| r.get(0),
        )
        .expect("dob");
    assert_eq!(dob, "1990-03-05");
}

#[test]
fn reimporting_the_identical_file_inserts_nothing() {
    let ws = temp_dir("facultyd-reimport");
    let conn = db::open_db(&ws).expect("open db");
    let cipher = CnicCipher::from_key(None).expect("cipher");
    let path = write_fixture(&ws, "staff.csv", &clean_rows());

    let first = run_import(&conn, &cipher, &path).expect("first import");
    assert_eq!(first.processed, 2);
    assert_eq!(first.skipped, 0);
    assert_eq!(first.outcome, ImportOutcome::Committed);

    let quals: i64 = conn
        .query_row("SELECT COUNT(*) FROM qualification", [], |r| r.get(0))
        .expect("count qualifications");
    assert_eq!(quals, 3);

    let second = run_import(&conn, &cipher, &path).expect("second import");
    assert_eq!(second.processed, 0);
    assert_eq!(second.skipped, second.total);
    assert!(second
        .skipped_entries
        .iter()
        .all(|e| e.reason.contains("duplicate")));

    let persons: i64 = conn
        .query_row("SELECT COUNT(*) FROM person", [], |r| r.get(0))
        .expect("count persons");
    assert_eq!(persons, 2);
    let quals_after: i64 = conn
        .query_row("SELECT COUNT(*) FROM qualification", [], |r| r.get(0))
        .expect("count qualifications");
    assert_eq!(quals_after, 3);

    // Both runs left an audit row.
    let audits: i64 = conn
        .query_row("SELECT COUNT(*) FROM import_audit", [], |r| r.get(0))
        .expect("count audits");
    assert_eq!(audits, 2);
}

#[test]
fn multi_address_email_cell_is_rejoined() {
    let ws = temp_dir("facultyd-email");
    let conn = db::open_db(&ws).expect("open db");
    let cipher = CnicCipher::from_key(None).expect("cipher");

    let csv = format!(
        "{FIXTURE_HEADER}\n\
Ali,Khan,Male,35202-1111111-1,A@x.com; b@x.com,,101,Professor,Active,2015-08-01,,,,,,,,,,\n"
    );
    let path = write_fixture(&ws, "staff.csv", &csv);
    let report = run_import(&conn, &cipher, &path).expect("import");
    assert_eq!(report.processed, 1);

    let email: String = conn
        .query_row("SELECT email FROM person", [], |r| r.get(0))
        .expect("email");
    assert_eq!(email, "a@x.com, b@x.com");
}
