//! Append-only JSONL journal of completed runs.
//!
//! One line per run, written best-effort after the profile is sealed. A
//! journal problem is a warning, never a scan failure.

use crate::aggregate::grade::LeadGrade;
use crate::aggregate::AuditProfile;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Summary line recorded for one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub run_id: String,
    pub site: String,
    pub timestamp: String,
    pub pages_scanned: usize,
    pub pages_failed: usize,
    pub total_violations: u64,
    pub grade: String,
}

impl RunRecord {
    pub fn new(profile: &AuditProfile, grade: LeadGrade) -> Self {
        Self {
            run_id: profile.run_id.clone(),
            site: profile.site.clone(),
            timestamp: profile.scanned_at.to_rfc3339(),
            pages_scanned: profile.pages_scanned,
            pages_failed: profile.pages_failed,
            total_violations: profile.total_violations(),
            grade: grade.to_string(),
        }
    }
}

/// Append-only journal file.
pub struct RunJournal {
    file: File,
}

impl RunJournal {
    /// Open or create the journal at the given path.
    pub fn open(path: &PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening run journal {}", path.display()))?;

        Ok(Self { file })
    }

    /// Open the default journal at `~/.prospector/scans.jsonl`.
    pub fn default_journal() -> Result<Self> {
        let path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".prospector")
            .join("scans.jsonl");
        Self::open(&path)
    }

    /// Append one run record.
    pub fn append(&mut self, record: &RunRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.file, "{json}")?;
        Ok(())
    }
}
