//! CSV renderer for the violation record list.

use crate::aggregate::AuditProfile;

const HEADER: &str = "rule_id,severity,page_url,occurrences,description,help,help_url";

/// Render every violation record as one CSV row.
pub fn render(profile: &AuditProfile) -> String {
    let mut out = String::with_capacity(256 + profile.violations.len() * 128);
    out.push_str(HEADER);
    out.push('\n');

    for v in &profile.violations {
        let row = [
            escape(&v.rule_id),
            v.severity.as_str().to_string(),
            escape(&v.page_url),
            v.occurrences.to_string(),
            escape(&v.description),
            escape(&v.help),
            escape(&v.help_url),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Quote a field when it contains a delimiter, quote, or newline.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
