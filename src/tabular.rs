//! Readers for the two accepted physical encodings: comma-separated text and
//! spreadsheet workbooks. Both produce the same in-memory `Table`; all cells
//! are carried as display strings and the normalizers own any further
//! interpretation (so numeric cells with a trailing ".0" and serial-number
//! date cells survive the trip intact).

use std::path::Path;

use calamine::{open_workbook_auto, Reader};

use crate::error::ImportError;

#[derive(Debug)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Cell accessor tolerant of short rows; anything out of range reads as
    /// an empty cell.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

pub fn read_table(path: &Path) -> Result<Table, ImportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let table = match ext.as_str() {
        "csv" => read_csv(path)?,
        "xlsx" | "xls" => read_workbook(path)?,
        other => {
            return Err(ImportError::FileRead(format!(
                "unsupported file extension {:?} (expected .csv, .xlsx or .xls)",
                other
            )))
        }
    };

    if table.headers.is_empty() || table.rows.is_empty() {
        return Err(ImportError::FileRead(
            "file contains no data rows".to_string(),
        ));
    }

    Ok(table)
}

fn read_csv(path: &Path) -> Result<Table, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ImportError::FileRead(e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::FileRead(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::FileRead(e.to_string()))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        // Pad short records so every row indexes safely against the headers.
        if row.len() < headers.len() {
            row.resize(headers.len(), String::new());
        }
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

fn read_workbook(path: &Path) -> Result<Table, ImportError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ImportError::FileRead(e.to_string()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::FileRead("workbook contains no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ImportError::FileRead(e.to_string()))?;

    let mut all: Vec<Vec<String>> = range
        .rows()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect();

    if all.is_empty() {
        return Ok(Table {
            headers: Vec::new(),
            rows: Vec::new(),
        });
    }
    let headers = all.remove(0);

    Ok(Table { headers, rows: all })
}
