use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

use crate::cipher::CnicCipher;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Process-wide context, constructed once at startup and passed down
/// explicitly; the cipher lives here rather than in any ambient global.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub cipher: CnicCipher,
}
