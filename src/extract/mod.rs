//! Per-entity extractors. Each one runs the same pipeline over the raw
//! table: resolve columns, normalize cells, fill fixed defaults, validate.
//! Rows with defaulted required fields are reported as a data-quality
//! signal, never dropped.

pub mod designation;
pub mod faculty;
pub mod person;
pub mod qualification;

pub use designation::{extract_designations, DesignationKind, RowDesignations};
pub use faculty::{extract_faculties, FacultyDraft};
pub use person::{extract_persons, PersonDraft};
pub use qualification::{extract_qualifications, QualificationDraft};

use serde::Serialize;

/// Required fields that were absent in the source and received their fixed
/// fallback, keyed by 1-based data-row index.
#[derive(Debug, Serialize)]
pub struct RowDefaults {
    pub row: usize,
    pub fields: Vec<&'static str>,
}
