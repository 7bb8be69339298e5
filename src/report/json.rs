//! Structured JSON export of the audit profile and grade.

use crate::aggregate::grade::LeadGrade;
use crate::aggregate::AuditProfile;
use anyhow::{Context, Result};

/// Render the sealed profile plus grade as pretty-printed JSON.
pub fn render(profile: &AuditProfile, grade: LeadGrade) -> Result<String> {
    let doc = serde_json::json!({
        "profile": profile,
        "grade": grade,
        "indeterminate": profile.is_indeterminate(),
    });
    serde_json::to_string_pretty(&doc).context("encoding report as JSON")
}
