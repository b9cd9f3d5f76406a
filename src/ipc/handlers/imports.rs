use crate::error::ImportError;
use crate::import;
use crate::ipc::error::{err, import_err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::Path;

fn error_code(e: &ImportError) -> &'static str {
    match e {
        ImportError::FileRead(_) => "file_read_failed",
        ImportError::ColumnMapping { .. } => "column_mapping_failed",
        ImportError::Storage(_) => "db_unavailable",
        ImportError::Commit(_) => "db_commit_failed",
    }
}

fn handle_import_file(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(path) = req.params.get("filePath").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.filePath", None);
    };

    match import::run_import(conn, &state.cipher, Path::new(path)) {
        Ok(report) => match serde_json::to_value(&report) {
            Ok(v) => ok(&req.id, v),
            Err(e) => err(&req.id, "internal", e.to_string(), None),
        },
        Err(e) => import_err(&req.id, error_code(&e), &e),
    }
}

fn handle_imports_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return ok(&req.id, json!({ "imports": [] }));
    };

    let mut stmt = match conn.prepare(
        "SELECT import_id, source_file, started_at, finished_at, outcome,
                processed, skipped, total
         FROM import_audit
         ORDER BY id DESC",
    ) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let rows = stmt
        .query_map([], |row| {
            let import_id: String = row.get(0)?;
            let source_file: String = row.get(1)?;
            let started_at: String = row.get(2)?;
            let finished_at: Option<String> = row.get(3)?;
            let outcome: String = row.get(4)?;
            let processed: i64 = row.get(5)?;
            let skipped: i64 = row.get(6)?;
            let total: i64 = row.get(7)?;
            Ok(json!({
                "importId": import_id,
                "sourceFile": source_file,
                "startedAt": started_at,
                "finishedAt": finished_at,
                "outcome": outcome,
                "processed": processed,
                "skipped": skipped,
                "total": total
            }))
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>());

    match rows {
        Ok(imports) => ok(&req.id, json!({ "imports": imports })),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "import.file" => Some(handle_import_file(state, req)),
        "imports.list" => Some(handle_imports_list(state, req)),
        _ => None,
    }
}
