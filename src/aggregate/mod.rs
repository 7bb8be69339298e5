//! Violation records, per-page outcomes, and the sealed audit profile.

pub mod grade;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rule identifiers kept in the frequency ranking.
pub const TOP_RULES_LIMIT: usize = 10;

/// Ordinal severity of a violation. Higher is worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl Severity {
    /// Parse a rule-engine impact token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "critical" => Some(Self::Critical),
            "serious" => Some(Self::Serious),
            "moderate" => Some(Self::Moderate),
            "minor" => Some(Self::Minor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Serious => "serious",
            Self::Moderate => "moderate",
            Self::Minor => "minor",
        }
    }
}

/// One rule failing on one page. An occurrence count above one means the
/// same failure was found on multiple DOM nodes of that page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Short code naming the failed check (e.g. `image-alt`).
    pub rule_id: String,
    pub severity: Severity,
    /// What the rule checks for.
    pub description: String,
    /// Remediation guidance.
    pub help: String,
    /// Link to the rule's documentation.
    pub help_url: String,
    /// Page the violation was found on.
    pub page_url: String,
    /// Number of affected DOM nodes.
    pub occurrences: u64,
}

/// Result of evaluating the rule engine on one loaded page.
#[derive(Debug, Clone, Default)]
pub struct PageAudit {
    pub violations: Vec<Violation>,
    pub passes: u64,
    pub incomplete: u64,
}

/// The terminal result of attempting one URL. A page is audited or it
/// failed; never both.
#[derive(Debug, Clone)]
pub enum PageResult {
    Audited(PageAudit),
    Failed { reason: String },
}

/// Exactly one of these exists per URL per run.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub url: String,
    pub result: PageResult,
}

impl PageOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.result, PageResult::Failed { .. })
    }
}

/// Occurrence counts summed per severity level across a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityTally {
    pub critical: u64,
    pub serious: u64,
    pub moderate: u64,
    pub minor: u64,
}

impl SeverityTally {
    pub fn add(&mut self, severity: Severity, count: u64) {
        match severity {
            Severity::Critical => self.critical += count,
            Severity::Serious => self.serious += count,
            Severity::Moderate => self.moderate += count,
            Severity::Minor => self.minor += count,
        }
    }

    pub fn total(&self) -> u64 {
        self.critical + self.serious + self.moderate + self.minor
    }

    pub fn critical_plus_serious(&self) -> u64 {
        self.critical + self.serious
    }
}

/// A (rule, total occurrences, severity) entry in the frequency ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFrequency {
    pub rule_id: String,
    pub occurrences: u64,
    pub severity: Severity,
}

/// The complete aggregate for one scan run. Built once from the full
/// outcome list and read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AuditProfile {
    pub run_id: String,
    pub site: String,
    pub scanned_at: DateTime<Utc>,
    pub pages_scanned: usize,
    pub pages_failed: usize,
    pub tally: SeverityTally,
    pub top_rules: Vec<RuleFrequency>,
    pub violations: Vec<Violation>,
}

impl AuditProfile {
    /// Aggregate a run's outcomes into a sealed profile.
    ///
    /// A run with zero successfully scanned pages produces a valid empty
    /// profile; absence of data is representable, not an error.
    pub fn from_outcomes(site: &str, outcomes: &[PageOutcome]) -> Self {
        let mut violations = Vec::new();
        let mut pages_scanned = 0;
        let mut pages_failed = 0;

        for outcome in outcomes {
            match &outcome.result {
                PageResult::Audited(audit) => {
                    pages_scanned += 1;
                    violations.extend(audit.violations.iter().cloned());
                }
                PageResult::Failed { .. } => pages_failed += 1,
            }
        }

        let mut tally = SeverityTally::default();
        for v in &violations {
            tally.add(v.severity, v.occurrences);
        }

        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            site: site.to_string(),
            scanned_at: Utc::now(),
            pages_scanned,
            pages_failed,
            tally,
            top_rules: rank_rules(&violations),
            violations,
        }
    }

    pub fn total_violations(&self) -> u64 {
        self.tally.total()
    }

    /// True when every attempted page failed. A Skip grade on an
    /// indeterminate profile means "no data", not "clean".
    pub fn is_indeterminate(&self) -> bool {
        self.pages_scanned == 0 && self.pages_failed > 0
    }
}

/// Group violations by rule id, sum occurrence counts, rank descending.
///
/// Rule identifiers are severity-stable within a run, so each group keeps
/// the severity of its first record. Ties break on rule id for
/// deterministic output.
fn rank_rules(violations: &[Violation]) -> Vec<RuleFrequency> {
    let mut by_rule: HashMap<&str, RuleFrequency> = HashMap::new();

    for v in violations {
        by_rule
            .entry(v.rule_id.as_str())
            .and_modify(|entry| entry.occurrences += v.occurrences)
            .or_insert_with(|| RuleFrequency {
                rule_id: v.rule_id.clone(),
                occurrences: v.occurrences,
                severity: v.severity,
            });
    }

    let mut ranking: Vec<RuleFrequency> = by_rule.into_values().collect();
    ranking.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
    ranking.truncate(TOP_RULES_LIMIT);
    ranking
}
