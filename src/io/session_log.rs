//! Flat append-only session log.
//!
//! One `YYYY-MM-DD HH:MM:SS message` line per event, flushed as it is written
//! so the file is complete even if the process is killed mid-session.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Handle to the session log, owned by the scheduler for the length of a session.
pub struct SessionLog {
    writer: Box<dyn Write>,
}

impl SessionLog {
    /// Open (or create) `path` for appending.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open session log {}", path.display()))?;

        Ok(Self::from_writer(Box::new(file)))
    }

    pub fn from_writer(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }

    /// A log that discards everything.
    pub fn sink() -> Self {
        Self::from_writer(Box::new(std::io::sink()))
    }

    /// Append one line stamped with `at`.
    ///
    /// Write failures are reported on the console and otherwise ignored; a full
    /// disk must not stop the capture loop.
    pub fn append(&mut self, at: DateTime<Utc>, message: &str) {
        let line = format!("{} {message}\n", at.format("%Y-%m-%d %H:%M:%S"));
        if let Err(e) = self
            .writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.flush())
        {
            log_warning!("Could not write to session log: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_append_writes_timestamped_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("session.log");
        let at = Utc.with_ymd_and_hms(2025, 6, 21, 21, 5, 9).unwrap();

        {
            let mut log = SessionLog::create(&path).unwrap();
            log.append(at, "Session started");
        }
        {
            let mut log = SessionLog::create(&path).unwrap();
            log.append(at, "Image 1: 1/125s ISO 100");
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "2025-06-21 21:05:09 Session started\n2025-06-21 21:05:09 Image 1: 1/125s ISO 100\n"
        );
    }
}
