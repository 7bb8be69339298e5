//! End-to-end pipeline behavior with a scripted driver: filter →
//! orchestrate → aggregate → grade.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use prospector::aggregate::grade::{grade, LeadGrade};
use prospector::aggregate::{AuditProfile, PageResult, Severity};
use prospector::config::ScanConfig;
use prospector::discovery::filter::filter_scannable;
use prospector::scan::driver::{CheckReport, PageDriver, RawViolation};
use prospector::scan::orchestrator::scan_pages;
use prospector::scan::pacer::Pacer;
use std::collections::HashMap;
use std::time::Duration;

/// Driver fed from a URL → result script. Failing URLs error on
/// navigation; everything else audits with the canned report.
struct ScriptedDriver {
    reports: HashMap<String, CheckReport>,
    failing: Vec<String>,
    current: Option<String>,
}

impl ScriptedDriver {
    fn new() -> Self {
        Self {
            reports: HashMap::new(),
            failing: Vec::new(),
            current: None,
        }
    }

    fn with_report(mut self, url: &str, report: CheckReport) -> Self {
        self.reports.insert(url.to_string(), report);
        self
    }

    fn with_failure(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }
}

#[async_trait]
impl PageDriver for ScriptedDriver {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<()> {
        if self.failing.iter().any(|u| u == url) {
            return Err(anyhow!("navigation timed out after 30s"));
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn run_checks(&mut self, _tags: &[String]) -> Result<CheckReport> {
        let url = self.current.as_deref().expect("run_checks before navigate");
        Ok(self.reports.get(url).cloned().unwrap_or_default())
    }
}

fn raw(rule: &str, severity: Severity, nodes: u64) -> RawViolation {
    RawViolation {
        rule_id: rule.to_string(),
        severity,
        description: format!("{rule} failed"),
        help: format!("fix {rule}"),
        help_url: format!("https://rules.example/{rule}"),
        nodes,
    }
}

fn report(violations: Vec<RawViolation>) -> CheckReport {
    CheckReport {
        violations,
        passes: 20,
        incomplete: 1,
    }
}

fn config() -> ScanConfig {
    ScanConfig::with_max_pages(10).without_delays()
}

#[tokio::test]
async fn filtered_discovery_feeds_the_scan_in_order() {
    // 12 discovered URLs, two of them binary resources, cap 10.
    let mut discovered: Vec<String> = (0..10)
        .map(|i| format!("https://example.com/page-{i}"))
        .collect();
    discovered.insert(3, "https://example.com/brochure.pdf".to_string());
    discovered.insert(7, "https://example.com/logo.png".to_string());

    let filtered = filter_scannable(&discovered, 10);
    assert_eq!(filtered.discovered, 12);
    assert_eq!(filtered.retained, 10);
    assert_eq!(filtered.urls.len(), 10);

    let mut driver = ScriptedDriver::new();
    let pacer = Pacer::new(Duration::ZERO);
    let outcomes = scan_pages(&mut driver, &filtered.urls, &config(), &pacer, |_, _| {}).await;

    // One outcome per filtered URL, in the filtered order.
    assert_eq!(outcomes.len(), 10);
    for (outcome, url) in outcomes.iter().zip(&filtered.urls) {
        assert_eq!(&outcome.url, url);
    }
}

#[tokio::test]
async fn page_failures_never_shrink_the_outcome_set() {
    let urls: Vec<String> = (0..5)
        .map(|i| format!("https://example.com/p{i}"))
        .collect();

    let mut driver = ScriptedDriver::new()
        .with_report(&urls[0], report(vec![raw("image-alt", Severity::Critical, 2)]))
        .with_failure(&urls[1])
        .with_failure(&urls[3]);

    let pacer = Pacer::new(Duration::ZERO);
    let outcomes = scan_pages(&mut driver, &urls, &config(), &pacer, |_, _| {}).await;

    assert_eq!(outcomes.len(), urls.len());
    assert!(outcomes[1].is_failure());
    assert!(outcomes[3].is_failure());

    let profile = AuditProfile::from_outcomes("example.com", &outcomes);
    assert_eq!(profile.pages_scanned, 3);
    assert_eq!(profile.pages_failed, 2);

    // A failed page is never also a source of violations.
    for outcome in &outcomes {
        if let PageResult::Failed { reason } = &outcome.result {
            assert!(!reason.is_empty());
            assert!(profile.violations.iter().all(|v| v.page_url != outcome.url));
        }
    }
}

#[tokio::test]
async fn aggregate_invariants_hold_across_pages() {
    let urls: Vec<String> = (0..3)
        .map(|i| format!("https://example.com/p{i}"))
        .collect();

    let mut driver = ScriptedDriver::new()
        .with_report(
            &urls[0],
            report(vec![
                raw("color-contrast", Severity::Serious, 6),
                raw("image-alt", Severity::Critical, 2),
            ]),
        )
        .with_report(
            &urls[1],
            report(vec![
                raw("color-contrast", Severity::Serious, 6),
                raw("html-has-lang", Severity::Moderate, 1),
            ]),
        )
        .with_report(&urls[2], report(vec![]));

    let pacer = Pacer::new(Duration::ZERO);
    let outcomes = scan_pages(&mut driver, &urls, &config(), &pacer, |_, _| {}).await;
    let profile = AuditProfile::from_outcomes("example.com", &outcomes);

    // total = critical + serious + moderate + minor
    assert_eq!(profile.tally.critical, 2);
    assert_eq!(profile.tally.serious, 12);
    assert_eq!(profile.tally.moderate, 1);
    assert_eq!(profile.tally.minor, 0);
    assert_eq!(profile.total_violations(), 15);

    // ...which equals the occurrence sum over the rule ranking.
    let ranking_sum: u64 = profile.top_rules.iter().map(|r| r.occurrences).sum();
    assert_eq!(ranking_sum, profile.total_violations());
    assert_eq!(profile.top_rules[0].rule_id, "color-contrast");
    assert_eq!(profile.top_rules[0].occurrences, 12);

    // Severity tally {critical:2, serious:12, moderate:1} grades A.
    assert_eq!(grade(&profile), LeadGrade::A);
}

#[tokio::test]
async fn moderate_findings_grade_b_then_c_as_they_thin_out() {
    let url = "https://example.com/".to_string();

    // critical+serious = 6 → B
    let mut driver = ScriptedDriver::new().with_report(
        &url,
        report(vec![
            raw("aria-roles", Severity::Serious, 6),
            raw("html-has-lang", Severity::Moderate, 2),
            raw("region", Severity::Minor, 1),
        ]),
    );
    let pacer = Pacer::new(Duration::ZERO);
    let outcomes = scan_pages(
        &mut driver,
        std::slice::from_ref(&url),
        &config(),
        &pacer,
        |_, _| {},
    )
    .await;
    let profile = AuditProfile::from_outcomes("example.com", &outcomes);
    assert_eq!(profile.total_violations(), 9);
    assert_eq!(grade(&profile), LeadGrade::B);

    // Only a handful of moderate/minor findings → C
    let mut driver = ScriptedDriver::new().with_report(
        &url,
        report(vec![
            raw("html-has-lang", Severity::Moderate, 3),
            raw("region", Severity::Minor, 1),
        ]),
    );
    let outcomes = scan_pages(
        &mut driver,
        std::slice::from_ref(&url),
        &config(),
        &pacer,
        |_, _| {},
    )
    .await;
    let profile = AuditProfile::from_outcomes("example.com", &outcomes);
    assert_eq!(profile.total_violations(), 4);
    assert_eq!(grade(&profile), LeadGrade::C);
}

#[tokio::test]
async fn clean_pages_grade_skip() {
    let urls = vec!["https://example.com/".to_string()];
    let mut driver = ScriptedDriver::new().with_report(&urls[0], report(vec![]));

    let pacer = Pacer::new(Duration::ZERO);
    let outcomes = scan_pages(&mut driver, &urls, &config(), &pacer, |_, _| {}).await;
    let profile = AuditProfile::from_outcomes("example.com", &outcomes);

    assert_eq!(profile.total_violations(), 0);
    assert_eq!(grade(&profile), LeadGrade::Skip);
    assert!(!profile.is_indeterminate());
}

#[tokio::test]
async fn total_failure_is_skip_but_flagged_indeterminate() {
    let urls: Vec<String> = (0..3)
        .map(|i| format!("https://example.com/p{i}"))
        .collect();
    let mut driver = ScriptedDriver::new()
        .with_failure(&urls[0])
        .with_failure(&urls[1])
        .with_failure(&urls[2]);

    let pacer = Pacer::new(Duration::ZERO);
    let outcomes = scan_pages(&mut driver, &urls, &config(), &pacer, |_, _| {}).await;
    let profile = AuditProfile::from_outcomes("example.com", &outcomes);

    assert_eq!(profile.pages_scanned, 0);
    assert_eq!(profile.pages_failed, 3);
    assert_eq!(grade(&profile), LeadGrade::Skip);
    assert!(profile.is_indeterminate());
}
