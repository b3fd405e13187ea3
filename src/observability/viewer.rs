//! Reading log files back for the `view-logs` CLI.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use colored::Colorize;
use serde_json::{Map, Value};

/// A file found in the log directory.
#[derive(Debug, Clone)]
pub struct LogFileInfo {
    pub name: String,
    pub size_bytes: u64,
    pub modified: DateTime<Local>,
}

impl LogFileInfo {
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// List regular files in `dir`, sorted by name.
pub fn list_log_files(dir: &Path) -> io::Result<Vec<LogFileInfo>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        files.push(LogFileInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            size_bytes: metadata.len(),
            modified: DateTime::<Local>::from(metadata.modified()?),
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Resolve a bare file name inside `dir`. Names with path components are rejected.
pub fn resolve_log_file(dir: &Path, name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    let is_bare = candidate.components().count() == 1 && candidate.file_name().is_some();
    is_bare.then(|| dir.join(candidate))
}

/// One line of a log file, parsed for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewLine {
    Entry {
        timestamp: String,
        level: String,
        message: String,
        details: Map<String, Value>,
    },
    Raw {
        line_no: usize,
        text: String,
    },
}

impl ViewLine {
    /// Parse the `index`-th (zero based) line. Blank lines yield `None`.
    pub fn parse(index: usize, line: &str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Map<String, Value>>(line) {
            Ok(mut fields) => {
                let mut take = |key: &str, default: &str| match fields.remove(key) {
                    Some(Value::String(s)) => s,
                    Some(other) => other.to_string(),
                    None => default.to_string(),
                };
                let timestamp = take("timestamp", "N/A");
                let level = take("level", "INFO");
                let message = take("message", "N/A");
                Some(ViewLine::Entry {
                    timestamp,
                    level,
                    message,
                    details: fields,
                })
            }
            Err(_) => Some(ViewLine::Raw {
                line_no: index + 1,
                text: line.to_string(),
            }),
        }
    }

    pub fn render(&self) -> String {
        match self {
            ViewLine::Entry {
                timestamp,
                level,
                message,
                details,
            } => {
                let level = level.to_ascii_uppercase();
                let head = format!("[{}] [{}]: {}", timestamp, level, message);
                let head = match level.as_str() {
                    "ERROR" => head.red(),
                    "WARN" => head.yellow(),
                    "INFO" => head.cyan(),
                    "DEBUG" => head.green(),
                    _ => head.white(),
                };
                if details.is_empty() {
                    head.to_string()
                } else {
                    let pretty = serde_json::to_string_pretty(details).unwrap_or_default();
                    format!("{}\n   Details: {}", head, pretty)
                }
            }
            ViewLine::Raw { line_no, text } => format!("Line {}: {}", line_no, text),
        }
    }
}
