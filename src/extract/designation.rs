use crate::columns;
use crate::normalize::clean_string;
use crate::tabular::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesignationKind {
    Academic,
    Administrative,
}

impl DesignationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesignationKind::Academic => "academic",
            DesignationKind::Administrative => "administrative",
        }
    }
}

/// Cleaned designation titles for one source row. `None` means the cell was
/// blank or resolved to "Unknown"; no designation row is created and the
/// faculty link stays NULL.
#[derive(Debug, Clone, Default)]
pub struct RowDesignations {
    pub academic: Option<String>,
    pub administrative: Option<String>,
}

/// Designation columns are optional; a table without them just yields
/// all-empty rows.
pub fn extract_designations(table: &Table) -> Vec<RowDesignations> {
    let cols = columns::resolve(columns::DESIGNATION_COLUMNS, &table.headers);
    let academic_col = cols.get("academic_designation").copied();
    let administrative_col = cols.get("administrative_designation").copied();

    (0..table.rows.len())
        .map(|i| RowDesignations {
            academic: academic_col.and_then(|c| clean_title(table.cell(i, c))),
            administrative: administrative_col.and_then(|c| clean_title(table.cell(i, c))),
        })
        .collect()
}

fn clean_title(raw: &str) -> Option<String> {
    let t = title_case(&clean_string(raw)?);
    if t == "Unknown" {
        None
    } else {
        Some(t)
    }
}

/// Word-wise title casing so "ASSOCIATE PROFESSOR" and "associate professor"
/// land on the same designation row.
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
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
    fn titles_are_case_folded() {
        let t = table(
            &["Academic Designation", "Administrative Designation"],
            &[
                &["ASSOCIATE PROFESSOR", "registrar"],
                &["associate professor", ""],
            ],
        );
        let rows = extract_designations(&t);
        assert_eq!(rows[0].academic.as_deref(), Some("Associate Professor"));
        assert_eq!(rows[0].administrative.as_deref(), Some("Registrar"));
        assert_eq!(rows[1].academic.as_deref(), Some("Associate Professor"));
        assert_eq!(rows[1].administrative, None);
    }

    #[test]
    fn unknown_and_null_tokens_yield_none() {
        let t = table(
            &["Academic Designation"],
            &[&["unknown"], &["N/A"], &["  "]],
        );
        let rows = extract_designations(&t);
        assert!(rows.iter().all(|r| r.academic.is_none()));
    }

    #[test]
    fn absent_columns_yield_empty_rows() {
        let t = table(&["Code"], &[&["1"], &["2"]]);
        let rows = extract_designations(&t);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].academic.is_none() && rows[0].administrative.is_none());
    }
}
