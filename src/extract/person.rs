use chrono::NaiveDate;

use super::RowDefaults;
use crate::columns;
use crate::error::ImportError;
use crate::normalize::{clean_date, clean_email, clean_int, clean_string, split_name};
use crate::tabular::Table;

/// One identity record, shaped for storage. Required columns carry their
/// defaults already applied; everything else stays optional.
#[derive(Debug, Clone)]
pub struct PersonDraft {
    pub first_name: String,
    pub last_name: String,
    pub father_husband_name: Option<String>,
    pub sex: String,
    pub dob: Option<NaiveDate>,
    pub cnic: Option<String>,
    pub cnic_expiry: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub blood_group: Option<String>,
    pub marital_status: Option<String>,
    pub date_of_marriage: Option<NaiveDate>,
    pub no_of_dependents: Option<i64>,
}

const FALLBACK: &str = "N/A";

pub fn extract_persons(
    table: &Table,
) -> Result<(Vec<PersonDraft>, Vec<RowDefaults>), ImportError> {
    let cols = columns::resolve(columns::PERSON_COLUMNS, &table.headers);
    if cols.is_empty() {
        return Err(ImportError::ColumnMapping { entity: "person" });
    }

    let mut drafts = Vec::with_capacity(table.rows.len());
    let mut defaults = Vec::new();

    for i in 0..table.rows.len() {
        let get = |name: &str| {
            cols.get(name)
                .map(|&c| table.cell(i, c))
                .unwrap_or("")
        };

        let mut first = clean_string(get("first_name"));
        let mut last = clean_string(get("last_name"));
        // Exports that carry a single full-name column get the splitter;
        // explicit first/last columns always win.
        if first.is_none() && last.is_none() {
            if let Some(full) = clean_string(get("full_name")) {
                let (f, l) = split_name(&full);
                first = f;
                last = l;
            }
        }

        let mut missing: Vec<&'static str> = Vec::new();
        let first_name = first.unwrap_or_else(|| {
            missing.push("first_name");
            FALLBACK.to_string()
        });
        let last_name = last.unwrap_or_else(|| {
            missing.push("last_name");
            FALLBACK.to_string()
        });
        let sex = clean_string(get("sex")).unwrap_or_else(|| {
            missing.push("sex");
            FALLBACK.to_string()
        });

        drafts.push(PersonDraft {
            first_name,
            last_name,
            father_husband_name: clean_string(get("father_husband_name")),
            sex,
            dob: clean_date(get("dob")),
            cnic: clean_string(get("cnic")),
            cnic_expiry: clean_date(get("cnic_expiry")),
            phone: clean_string(get("phone")),
            email: clean_email(get("email")),
            blood_group: clean_string(get("blood_group")),
            marital_status: clean_string(get("marital_status")),
            date_of_marriage: clean_date(get("date_of_marriage")),
            no_of_dependents: clean_int(get("no_of_dependents")),
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
