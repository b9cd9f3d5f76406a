use super::RowDefaults;
use crate::columns;
use crate::error::ImportError;
use crate::normalize::{clean_date, clean_email, clean_int, clean_string};
use crate::tabular::Table;

/// Employment record for one source row. `code` stays `None` when the cell
/// is missing or unparseable; the importer assigns the owning person's id as
/// the fallback so the value stays unique within the batch.
#[derive(Debug, Clone)]
pub struct FacultyDraft {
    pub code: Option<i64>,
    pub title: String,
    pub university_email: Option<String>,
    pub status: String,
    pub date_of_joining: String,
}

const TITLE_FALLBACK: &str = "Unknown";
const STATUS_FALLBACK: &str = "N/A";
/// Sentinel for absent joining dates; storage requires the column.
const JOINING_SENTINEL: &str = "1900-01-01";

pub fn extract_faculties(
    table: &Table,
) -> Result<(Vec<FacultyDraft>, Vec<RowDefaults>), ImportError> {
    let cols = columns::resolve(columns::FACULTY_COLUMNS, &table.headers);
    if cols.is_empty() {
        return Err(ImportError::ColumnMapping { entity: "faculty" });
    }

    let mut drafts = Vec::with_capacity(table.rows.len());
    let mut defaults = Vec::new();

    for i in 0..table.rows.len() {
        let get = |name: &str| {
            cols.get(name)
                .map(|&c| table.cell(i, c))
                .unwrap_or("")
        };

        let mut missing: Vec<&'static str> = Vec::new();

        let code = clean_int(get("code"));
        if code.is_none() {
            missing.push("code");
        }
        let title = clean_string(get("title")).unwrap_or_else(|| {
            missing.push("title");
            TITLE_FALLBACK.to_string()
        });
        let status = clean_string(get("status")).unwrap_or_else(|| {
            missing.push("status");
            STATUS_FALLBACK.to_string()
        });
        let date_of_joining = clean_date(get("date_of_joining"))
            .map(|d| d.to_string())
            .unwrap_or_else(|| {
                missing.push("date_of_joining");
                JOINING_SENTINEL.to_string()
            });

        drafts.push(FacultyDraft {
            code,
            title,
            university_email: clean_email(get("university_email")),
            status,
            date_of_joining,
        });

        if !missing.is_empty() {
            defaults.push(RowDefaults {
                row: i + 1,
                fields: missing,
            });
        }
    }

    Ok((drafts, defaults))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn extracts_with_float_coerced_code() {
        let t = table(
            &["Code", "Title", "Email", "Status", "Date of Joining"],
            &[&["101.0", "Professor", "P.Khan@uni.edu", "Active", "2015-08-01"]],
        );
        let (drafts, defaults) = extract_faculties(&t).expect("faculty");
        let f = &drafts[0];
        assert_eq!(f.code, Some(101));
        assert_eq!(f.university_email.as_deref(), Some("p.khan@uni.edu"));
        assert_eq!(f.date_of_joining, "2015-08-01");
        assert!(defaults.is_empty());
    }

    #[test]
    fn missing_fields_fall_back_with_signal() {
        let t = table(&["Code"], &[&["N/A"]]);
        let (drafts, defaults) = extract_faculties(&t).expect("faculty");
        let f = &drafts[0];
        assert_eq!(f.code, None);
        assert_eq!(f.title, "Unknown");
        assert_eq!(f.status, "N/A");
        assert_eq!(f.date_of_joining, "1900-01-01");
        assert_eq!(defaults.len(), 1);
        assert!(defaults[0].fields.contains(&"code"));
        assert!(defaults[0].fields.contains(&"date_of_joining"));
    }

    #[test]
    fn wholly_unmapped_table_fails() {
        let t = table(&["Widget"], &[&["a"]]);
        assert!(extract_faculties(&t).is_err());
    }
}
