//! Plaintext summary renderer for the terminal.

use crate::aggregate::grade::LeadGrade;
use crate::aggregate::AuditProfile;
use std::fmt::Write;

/// Render a human-readable run summary.
pub fn render(profile: &AuditProfile, grade: LeadGrade) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Site:       {}", profile.site);
    let _ = writeln!(
        out,
        "Scanned:    {} ({} pages ok, {} failed)",
        profile.scanned_at.format("%Y-%m-%d %H:%M UTC"),
        profile.pages_scanned,
        profile.pages_failed
    );
    let _ = writeln!(out);

    let tally = &profile.tally;
    let _ = writeln!(out, "Violations by severity:");
    let _ = writeln!(out, "  critical  {:>6}", tally.critical);
    let _ = writeln!(out, "  serious   {:>6}", tally.serious);
    let _ = writeln!(out, "  moderate  {:>6}", tally.moderate);
    let _ = writeln!(out, "  minor     {:>6}", tally.minor);
    let _ = writeln!(out, "  total     {:>6}", tally.total());
    let _ = writeln!(out);

    if !profile.top_rules.is_empty() {
        let _ = writeln!(out, "Most frequent rules:");
        for rule in &profile.top_rules {
            let _ = writeln!(
                out,
                "  {:<28} {:>5}  ({})",
                rule.rule_id,
                rule.occurrences,
                rule.severity.as_str()
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Lead grade: {grade}");
    if profile.is_indeterminate() {
        let _ = writeln!(
            out,
            "Note: indeterminate — no pages could be scanned; this grade\n\
             reflects missing data, not a clean site."
        );
    }

    out
}
