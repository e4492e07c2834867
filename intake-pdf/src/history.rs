//! Append-only log of past submissions, kept as a JSON array file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::application::Application;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// Submission time in epoch milliseconds.
    pub id: i64,
    pub file_name: String,
    #[serde(serialize_with = "iso_millis")]
    pub submitted_at: DateTime<Utc>,
    pub data: Application,
}

impl SubmissionRecord {
    /// `submitted_at` is kept to millisecond precision.
    pub fn new(file_name: impl Into<String>, submitted_at: DateTime<Utc>, data: Application) -> Self {
        let submitted_at = submitted_at.trunc_subsecs(3);
        SubmissionRecord {
            id: submitted_at.timestamp_millis(),
            file_name: file_name.into(),
            submitted_at,
            data,
        }
    }
}

/// `2025-04-02T10:30:00.000Z`: always three fractional digits.
fn iso_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        History { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, oldest first. A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<SubmissionRecord>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Add a record to the end and rewrite the file.
    pub fn append(&self, record: SubmissionRecord) -> Result<()> {
        let mut records = self.load()?;
        records.push(record);
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, json)?;
        log::debug!("history {} now has {} record(s)", self.path.display(), records.len());
        Ok(())
    }
}
