//! Daily rotating log files.
//!
//! Files are named `{category}-{YYYY-MM-DD}.log`. When a file would grow past
//! the size cap the writer moves to `{category}-{YYYY-MM-DD}.{n}.log`. A new
//! local day starts a new file and prunes files outside the retention window.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};

/// Which bucket a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Error,
    Combined,
    Access,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Error, Category::Combined, Category::Access];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Error => "error",
            Category::Combined => "combined",
            Category::Access => "access",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed form of a rotated file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFileName {
    pub category: Category,
    pub date: NaiveDate,
    pub segment: u32,
}

impl LogFileName {
    pub fn new(category: Category, date: NaiveDate, segment: u32) -> Self {
        Self { category, date, segment }
    }

    /// Parse `combined-2025-08-21.log` or `combined-2025-08-21.3.log`.
    pub fn parse(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(".log")?;
        let (category, rest) = stem.split_once('-')?;
        let category = Category::parse(category)?;
        let (date, segment) = match rest.split_once('.') {
            Some((date, segment)) => (date, segment.parse().ok()?),
            None => (rest, 0),
        };
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        Some(Self { category, date, segment })
    }
}

impl fmt::Display for LogFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.date.format("%Y-%m-%d");
        if self.segment == 0 {
            write!(f, "{}-{}.log", self.category, date)
        } else {
            write!(f, "{}-{}.{}.log", self.category, date, self.segment)
        }
    }
}

struct ActiveFile {
    name: LogFileName,
    file: File,
    written: u64,
}

/// Append-only writer for one category of log files.
pub struct RollingFile {
    dir: PathBuf,
    category: Category,
    max_bytes: u64,
    retention_days: u32,
    current: Option<ActiveFile>,
}

impl RollingFile {
    pub fn new(dir: impl Into<PathBuf>, category: Category, max_bytes: u64, retention_days: u32) -> Self {
        Self {
            dir: dir.into(),
            category,
            max_bytes,
            retention_days,
            current: None,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Append one complete line (including its trailing newline) for `day`.
    ///
    /// The line is written with a single `write_all` on an append-mode handle.
    pub fn append(&mut self, day: NaiveDate, line: &[u8]) -> io::Result<()> {
        let active = self.active_file(day, line.len() as u64)?;
        active.file.write_all(line)?;
        active.written += line.len() as u64;
        Ok(())
    }

    /// Path of the file currently receiving writes, if any.
    pub fn current_path(&self) -> Option<PathBuf> {
        self.current.as_ref().map(|a| self.dir.join(a.name.to_string()))
    }

    fn active_file(&mut self, day: NaiveDate, incoming: u64) -> io::Result<&mut ActiveFile> {
        let reusable = matches!(
            &self.current,
            Some(a) if a.name.date == day && (a.written == 0 || a.written + incoming <= self.max_bytes)
        );

        if !reusable {
            let (first_segment, new_day) = match &self.current {
                Some(a) if a.name.date == day => (a.name.segment + 1, false),
                _ => (0, true),
            };
            self.current = None;

            if new_day {
                if let Err(e) = self.prune(day) {
                    tracing::warn!(category = %self.category, error = %e, "Failed to prune old log files");
                }
            }

            let opened = self.open_segment(day, first_segment, incoming)?;
            return Ok(self.current.insert(opened));
        }

        self.current
            .as_mut()
            .ok_or_else(|| io::Error::other("no active log file"))
    }

    fn open_segment(&self, day: NaiveDate, mut segment: u32, incoming: u64) -> io::Result<ActiveFile> {
        loop {
            let name = LogFileName::new(self.category, day, segment);
            let path = self.dir.join(name.to_string());
            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

            if size == 0 || size + incoming <= self.max_bytes {
                let file = OpenOptions::new().create(true).append(true).open(&path)?;
                return Ok(ActiveFile { name, file, written: size });
            }
            segment += 1;
        }
    }

    /// Delete this category's files that fall outside the retention window.
    ///
    /// The window keeps `retention_days` calendar days, `today` included.
    pub fn prune(&self, today: NaiveDate) -> io::Result<usize> {
        let keep_days = u64::from(self.retention_days.saturating_sub(1));
        let Some(oldest_kept) = today.checked_sub_days(Days::new(keep_days)) else {
            return Ok(0);
        };

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(parsed) = file_name.to_str().and_then(LogFileName::parse) else {
                continue;
            };
            if parsed.category == self.category && parsed.date < oldest_kept {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Create the log directory if needed.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
