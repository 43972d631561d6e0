use crate::core::{Result, SentimentError};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub const VISITOR_LOG_FILE: &str = "sentiment_visitor_log.csv";

/// Written in place of a missing IP or city.
pub const PLACEHOLDER: &str = "—";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorEntry {
    pub timestamp: String,
    pub ip: String,
    pub city: String,
}

/// Append-only CSV log of visits (`timestamp,ip,city`).
#[derive(Debug, Clone)]
pub struct VisitorLog {
    path: PathBuf,
}

impl VisitorLog {
    /// Log stored as `sentiment_visitor_log.csv` inside `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(VISITOR_LOG_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, ip: Option<&str>, city: Option<&str>) -> Result<VisitorEntry> {
        self.record_at(Utc::now(), ip, city)
    }

    pub fn record_at(
        &self,
        at: DateTime<Utc>,
        ip: Option<&str>,
        city: Option<&str>,
    ) -> Result<VisitorEntry> {
        let entry = VisitorEntry {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            ip: or_placeholder(ip, &["undefined", "none"]),
            city: or_placeholder(city, &["undefined", "none"]),
        };

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let is_new = std::fs::metadata(&self.path).map_or(true, |m| m.len() == 0);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = WriterBuilder::new()
            .has_headers(is_new)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);
        writer.serialize(&entry).map_err(log_error)?;
        writer.flush()?;

        tracing::debug!(path = %self.path.display(), ip = %entry.ip, "visit recorded");
        Ok(entry)
    }

    /// All recorded visits, oldest first. A log that does not exist yet is empty.
    pub fn entries(&self) -> Result<Vec<VisitorEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(log_error)?;
        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record.map_err(log_error)?;
            let field = |i: usize| record.get(i).map(str::trim).filter(|s| !s.is_empty());
            entries.push(VisitorEntry {
                timestamp: field(0).unwrap_or(PLACEHOLDER).to_string(),
                ip: or_placeholder(field(1), &["undefined", "unknown", "none"]),
                city: or_placeholder(field(2), &["undefined", "unknown", "none"]),
            });
        }
        Ok(entries)
    }
}

fn or_placeholder(value: Option<&str>, missing: &[&str]) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() && !missing.contains(&v.to_lowercase().as_str()) => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn log_error(e: csv::Error) -> SentimentError {
    SentimentError::Io(std::io::Error::other(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn writes_header_once_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = VisitorLog::new(dir.path());
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();

        log.record_at(at, Some("203.0.113.7"), Some("Lisbon, PT")).unwrap();
        log.record_at(at, None, Some("undefined")).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "timestamp,ip,city\n\
             2024-03-09 14:05:00 UTC,203.0.113.7,\"Lisbon, PT\"\n\
             2024-03-09 14:05:00 UTC,—,—\n"
        );

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].city, "Lisbon, PT");
        assert_eq!(entries[1].ip, PLACEHOLDER);
    }

    #[test]
    fn reading_normalizes_unknown_values() {
        let dir = tempfile::tempdir().unwrap();
        let log = VisitorLog::new(dir.path());
        std::fs::write(log.path(), "timestamp,ip,city\n,Unknown,\n").unwrap();

        let entries = log.entries().unwrap();
        assert_eq!(
            entries,
            vec![VisitorEntry {
                timestamp: PLACEHOLDER.to_string(),
                ip: PLACEHOLDER.to_string(),
                city: PLACEHOLDER.to_string(),
            }]
        );
    }

    #[test]
    fn missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VisitorLog::new(dir.path()).entries().unwrap().is_empty());
    }
}
