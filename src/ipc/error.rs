use serde_json::json;

use crate::error::ImportError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Fatal import failures carry the failing stage and error category so the
/// caller can tell a bad file from an unreachable database.
pub fn import_err(id: &str, code: &str, e: &ImportError) -> serde_json::Value {
    err(
        id,
        code,
        e.to_string(),
        Some(json!({
            "stage": e.stage(),
            "category": e.category(),
        })),
    )
}
