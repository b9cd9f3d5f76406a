//! Wide-to-long unpivot of the repeated qualification column groups. One
//! output record per (row x group) where the group's title cell is
//! non-empty; an empty title skips the group entirely; absence of a
//! qualification is not a data-quality defect.

use crate::columns::QUALIFICATION_GROUPS;
use crate::normalize::{clean_string, clean_year};
use crate::tabular::Table;

#[derive(Debug, Clone)]
pub struct QualificationDraft {
    /// 1-based data-row index linking back to the owning person's row.
    pub row: usize,
    pub category: &'static str,
    pub title: String,
    pub institution: Option<String>,
    pub country: Option<String>,
    pub year: Option<i64>,
}

pub fn extract_qualifications(table: &Table) -> Vec<QualificationDraft> {
    let position = |name: &str| table.headers.iter().position(|h| h == name);

    let mut out = Vec::new();
    for group in QUALIFICATION_GROUPS {
        let Some(title_col) = position(group.title) else {
            continue;
        };
        let institution_col = position(group.institution);
        let country_col = position(group.country);
        let year_col = position(group.year);

        for i in 0..table.rows.len() {
            let Some(title) = clean_string(table.cell(i, title_col)) else {
                continue;
            };
            out.push(QualificationDraft {
                row: i + 1,
                category: group.category,
                title,
                institution: institution_col.and_then(|c| clean_string(table.cell(i, c))),
                country: country_col.and_then(|c| clean_string(table.cell(i, c))),
                year: year_col.and_then(|c| clean_year(table.cell(i, c))),
            });
        }
    }
    out
}
