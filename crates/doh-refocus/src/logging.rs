//! Best-effort debug logging to an append-only file

use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Log location relative to the process working directory.
const LOG_DIR: &str = ".doh/logs";
const LOG_FILE: &str = "qwen.log";

/// Append a timestamped entry to the debug log under the current working
/// directory. Failures are reported to stderr and otherwise swallowed;
/// logging never affects the transformation.
pub fn log_event(message: &str, data: &serde_json::Value) {
    let result = std::env::current_dir()
        .map_err(Into::into)
        .and_then(|cwd| append_entry(&cwd.join(LOG_DIR), message, data));
    if let Err(e) = result {
        eprintln!("doh: failed to write debug log: {e}");
    }
}

fn append_entry(dir: &Path, message: &str, data: &serde_json::Value) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let payload = serde_json::to_string_pretty(&expand_embedded_json(data.clone()))?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;
    write!(file, "[{timestamp}] {message}\n{payload}\n\n")?;
    Ok(())
}

/// Re-parse string values under `arguments` and `content` keys that are
/// themselves JSON, so nested payloads land in the log unescaped.
fn expand_embedded_json(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| {
                    let val = match val {
                        Value::String(s) if key == "arguments" || key == "content" => {
                            serde_json::from_str(&s).unwrap_or_else(|_| Value::String(s))
                        }
                        other => expand_embedded_json(other),
                    };
                    (key, val)
                })
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(expand_embedded_json).collect())
        }
        other => other,
    }
}
