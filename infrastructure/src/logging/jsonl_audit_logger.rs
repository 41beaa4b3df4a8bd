//! JSONL file writer for the tool-call audit trail.
//!
//! Each [`AuditEntry`] becomes a single JSON line with a `type` field and
//! an RFC 3339 `timestamp`, appended through a buffered writer.

use conductor_application::ports::audit::{AuditEntry, AuditLogger};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

const ENTRY_TYPE: &str = "tool_call";

/// Append-only JSONL audit logger.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and on `Drop`.
pub struct JsonlAuditLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditLogger {
    /// Open `path` for appending, creating it (and parent directories) if needed.
    ///
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the audit file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLogger for JsonlAuditLogger {
    fn log(&self, entry: AuditEntry) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = match serde_json::to_value(&entry) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => return,
            Err(e) => {
                warn!(tool = %entry.tool_name, "Could not serialize audit entry: {}", e);
                return;
            }
        };
        record.insert("type".to_string(), ENTRY_TYPE.into());
        record.insert("timestamp".to_string(), timestamp.into());

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!(path = %self.path.display(), "Could not write audit entry: {}", e);
            }
        }
    }
}

impl Drop for JsonlAuditLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
