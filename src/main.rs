use std::io::{self, BufRead, Write};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use facultyd::cipher::CnicCipher;
use facultyd::ipc;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries IPC frames; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let key = std::env::var("FACULTYD_CNIC_KEY").ok();
    let cipher = CnicCipher::from_key(key.as_deref())?;

    let mut state = ipc::AppState {
        workspace: None,
        db: None,
        cipher,
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id; ignore.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    Ok(())
}
