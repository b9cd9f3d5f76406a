use thiserror::Error;

/// Fatal import failures. Row-level problems (duplicates, bad cells) are
/// never errors; they become skip entries in the import report.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read source file: {0}")]
    FileRead(String),

    #[error("no {entity} columns found in the source file")]
    ColumnMapping { entity: &'static str },

    #[error("storage error while preparing import: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("failed to commit import: {0}")]
    Commit(String),
}

impl ImportError {
    pub fn stage(&self) -> &'static str {
        match self {
            ImportError::FileRead(_) => "file-read",
            ImportError::ColumnMapping { .. } => "column-mapping",
            ImportError::Storage(_) => "storage",
            ImportError::Commit(_) => "commit",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            ImportError::FileRead(_) | ImportError::ColumnMapping { .. } => "input-malformed",
            ImportError::Storage(_) | ImportError::Commit(_) => "storage",
        }
    }
}

pub type Result<T, E = ImportError> = std::result::Result<T, E>;
