//! Column alias tables. Matching is exact (case- and whitespace-sensitive);
//! unmapped source columns are ignored and unresolved canonical columns stay
//! absent until the extractors apply their defaults.
//!
//! Several aliases reproduce misspellings found in real exports ("Blood
//! Gorup", "Martial Status", "No. of Dependendts"). They are load-bearing
//! compatibility aliases, not typos to fix.

use std::collections::HashMap;

pub const PERSON_COLUMNS: &[(&str, &str)] = &[
    ("First name", "first_name"),
    ("First Name", "first_name"),
    ("Last name", "last_name"),
    ("Last Name", "last_name"),
    ("Full Name", "full_name"),
    ("Employee Name", "full_name"),
    ("Father/Husband name", "father_husband_name"),
    ("Father/Husband Name", "father_husband_name"),
    ("Sex", "sex"),
    ("DoB", "dob"),
    ("Date of Birth", "dob"),
    ("CNIC", "cnic"),
    ("CNIC #", "cnic"),
    ("CNIC Expiry", "cnic_expiry"),
    ("CNIC Expiry Date", "cnic_expiry"),
    ("Mobile", "phone"),
    ("Mobile #", "phone"),
    ("Phone Number", "phone"),
    ("Email", "email"),
    ("Personal Email", "email"),
    ("Blood Gorup", "blood_group"),
    ("Blood Group", "blood_group"),
    ("Martial Status", "marital_status"),
    ("Marital Status", "marital_status"),
    ("DoM", "date_of_marriage"),
    ("Date of Marriage", "date_of_marriage"),
    ("No. of Dependendts", "no_of_dependents"),
    ("No Of Dependents", "no_of_dependents"),
];

pub const FACULTY_COLUMNS: &[(&str, &str)] = &[
    ("Code", "code"),
    ("Title", "title"),
    ("Faculty Title", "title"),
    ("Email", "university_email"),
    ("University Email", "university_email"),
    ("Status", "status"),
    ("Date of Joining", "date_of_joining"),
    ("Academic Designation", "academic_designation"),
];

pub const DESIGNATION_COLUMNS: &[(&str, &str)] = &[
    ("Academic Designation", "academic_designation"),
    ("Administrative Designation", "administrative_designation"),
];

/// Resolve an alias table against the headers actually present. Returns
/// canonical name -> column index; the first alias hit for a canonical name
/// wins.
pub fn resolve(
    aliases: &[(&str, &'static str)],
    headers: &[String],
) -> HashMap<&'static str, usize> {
    let mut out: HashMap<&'static str, usize> = HashMap::new();
    for &(source, canonical) in aliases {
        if out.contains_key(canonical) {
            continue;
        }
        if let Some(idx) = headers.iter().position(|h| h == source) {
            out.insert(canonical, idx);
        }
    }
    out
}

/// One repeated qualification column group. Groups are statically known by
/// position; adding a new repeated column means extending this table.
pub struct QualGroup {
    pub title: &'static str,
    pub institution: &'static str,
    pub country: &'static str,
    pub year: &'static str,
    pub category: &'static str,
}

pub const QUALIFICATION_GROUPS: &[QualGroup] = &[
    QualGroup {
        title: "Qualification 1",
        institution: "University 1",
        country: "Country 1",
        year: "Year 1",
        category: "Educational",
    },
    QualGroup {
        title: "Qualification 2",
        institution: "University 2",
        country: "Country 2",
        year: "Year 2",
        category: "Educational",
    },
    QualGroup {
        title: "Qualification 3",
        institution: "University 3",
        country: "Country 3",
        year: "Year 3",
        category: "Educational",
    },
    QualGroup {
        title: "Professional Qualification 1",
        institution: "University/Institute 1",
        country: "Country 1.1",
        year: "Year 1.1",
        category: "Professional",
    },
    QualGroup {
        title: "Professional Qualification 2",
        institution: "University/Institute 2",
        country: "Country 2.1",
        year: "Year 2.1",
        category: "Professional",
    },
];
