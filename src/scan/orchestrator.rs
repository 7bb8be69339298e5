//! Sequential page audit loop.
//!
//! Drives the shared page context across the filtered URL list, one URL
//! at a time: navigate, let the page settle, evaluate the rules, record
//! the outcome. A page's failure is data, never a reason to stop.

use super::driver::{CheckReport, PageDriver};
use super::pacer::Pacer;
use crate::aggregate::{PageAudit, PageOutcome, PageResult, Violation};
use crate::config::ScanConfig;
use tracing::{info, warn};

/// Audit every URL in order, producing exactly one outcome per URL.
///
/// `on_page` is called after each outcome is recorded, with the zero-based
/// index of the page just finished.
pub async fn scan_pages<D>(
    driver: &mut D,
    urls: &[String],
    config: &ScanConfig,
    pacer: &Pacer,
    mut on_page: impl FnMut(usize, &PageOutcome),
) -> Vec<PageOutcome>
where
    D: PageDriver + ?Sized,
{
    let mut outcomes = Vec::with_capacity(urls.len());

    for (index, url) in urls.iter().enumerate() {
        pacer.pause().await;

        let result = audit_one(driver, url, config).await;
        pacer.mark().await;

        let outcome = match result {
            Ok(audit) => {
                info!(
                    "audited {url}: {} violations, {} passes",
                    audit.violations.len(),
                    audit.passes
                );
                PageOutcome {
                    url: url.clone(),
                    result: PageResult::Audited(audit),
                }
            }
            Err(e) => {
                let reason = format!("{e:#}");
                warn!("failed to audit {url}: {reason}");
                PageOutcome {
                    url: url.clone(),
                    result: PageResult::Failed { reason },
                }
            }
        };

        on_page(index, &outcome);
        outcomes.push(outcome);
    }

    outcomes
}

/// Navigate to one URL, wait for deferred content, run the checks.
async fn audit_one<D>(driver: &mut D, url: &str, config: &ScanConfig) -> anyhow::Result<PageAudit>
where
    D: PageDriver + ?Sized,
{
    driver.navigate(url, config.nav_timeout).await?;

    // The rule engine has no view of async rendering; give scripts a
    // fixed window to finish mutating the page.
    if !config.settle_delay.is_zero() {
        tokio::time::sleep(config.settle_delay).await;
    }

    let report = driver.run_checks(&config.tags).await?;
    Ok(stamp_page(report, url))
}

/// Tie the engine's raw findings to the page they were found on.
fn stamp_page(report: CheckReport, url: &str) -> PageAudit {
    let violations = report
        .violations
        .into_iter()
        .map(|raw| Violation {
            rule_id: raw.rule_id,
            severity: raw.severity,
            description: raw.description,
            help: raw.help,
            help_url: raw.help_url,
            page_url: url.to_string(),
            occurrences: raw.nodes,
        })
        .collect();

    PageAudit {
        violations,
        passes: report.passes,
        incomplete: report.incomplete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Severity;
    use crate::scan::driver::RawViolation;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Scripted driver: maps URLs to canned reports or failures.
    struct ScriptedDriver {
        reports: HashMap<String, Result<CheckReport, String>>,
        current: Option<String>,
        navigations: Vec<String>,
    }

    impl ScriptedDriver {
        fn new(reports: HashMap<String, Result<CheckReport, String>>) -> Self {
            Self {
                reports,
                current: None,
                navigations: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl PageDriver for ScriptedDriver {
        async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<()> {
            self.navigations.push(url.to_string());
            match self.reports.get(url) {
                Some(Err(reason)) if reason.starts_with("nav:") => {
                    Err(anyhow!("{}", reason.trim_start_matches("nav:")))
                }
                _ => {
                    self.current = Some(url.to_string());
                    Ok(())
                }
            }
        }

        async fn run_checks(&mut self, _tags: &[String]) -> Result<CheckReport> {
            let url = self.current.clone().expect("run_checks before navigate");
            match self.reports.get(&url) {
                Some(Ok(report)) => Ok(report.clone()),
                Some(Err(reason)) => Err(anyhow!("{reason}")),
                None => Ok(CheckReport::default()),
            }
        }
    }

    fn report_with(rule: &str, severity: Severity, nodes: u64) -> CheckReport {
        CheckReport {
            violations: vec![RawViolation {
                rule_id: rule.to_string(),
                severity,
                description: String::new(),
                help: String::new(),
                help_url: String::new(),
                nodes,
            }],
            passes: 12,
            incomplete: 0,
        }
    }

    fn quiet_config() -> ScanConfig {
        ScanConfig::default().without_delays()
    }

    #[tokio::test]
    async fn test_one_outcome_per_url_in_order() {
        let urls = vec![
            "https://example.com/".to_string(),
            "https://example.com/about".to_string(),
            "https://example.com/contact".to_string(),
        ];
        let mut reports = HashMap::new();
        reports.insert(urls[0].clone(), Ok(report_with("image-alt", Severity::Critical, 2)));
        reports.insert(urls[1].clone(), Err("nav:connection refused".to_string()));
        reports.insert(urls[2].clone(), Ok(CheckReport::default()));

        let mut driver = ScriptedDriver::new(reports);
        let pacer = Pacer::new(Duration::ZERO);
        let outcomes =
            scan_pages(&mut driver, &urls, &quiet_config(), &pacer, |_, _| {}).await;

        assert_eq!(outcomes.len(), 3);
        let order: Vec<&str> = outcomes.iter().map(|o| o.url.as_str()).collect();
        assert_eq!(order, urls.iter().map(|u| u.as_str()).collect::<Vec<_>>());
        assert!(!outcomes[0].is_failure());
        assert!(outcomes[1].is_failure());
        assert!(!outcomes[2].is_failure());
    }

    #[tokio::test]
    async fn test_failure_reason_is_recorded() {
        let urls = vec!["https://example.com/broken".to_string()];
        let mut reports = HashMap::new();
        reports.insert(urls[0].clone(), Err("script crashed".to_string()));

        let mut driver = ScriptedDriver::new(reports);
        let pacer = Pacer::new(Duration::ZERO);
        let outcomes =
            scan_pages(&mut driver, &urls, &quiet_config(), &pacer, |_, _| {}).await;

        match &outcomes[0].result {
            PageResult::Failed { reason } => assert!(reason.contains("script crashed")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_violations_are_stamped_with_page_url() {
        let urls = vec!["https://example.com/pricing".to_string()];
        let mut reports = HashMap::new();
        reports.insert(
            urls[0].clone(),
            Ok(report_with("color-contrast", Severity::Serious, 5)),
        );

        let mut driver = ScriptedDriver::new(reports);
        let pacer = Pacer::new(Duration::ZERO);
        let outcomes =
            scan_pages(&mut driver, &urls, &quiet_config(), &pacer, |_, _| {}).await;

        match &outcomes[0].result {
            PageResult::Audited(audit) => {
                assert_eq!(audit.violations[0].page_url, "https://example.com/pricing");
                assert_eq!(audit.violations[0].occurrences, 5);
            }
            other => panic!("expected audit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_progress_callback_sees_every_page() {
        let urls: Vec<String> = (0..4)
            .map(|i| format!("https://example.com/p{i}"))
            .collect();
        let mut reports = HashMap::new();
        reports.insert(urls[2].clone(), Err("nav:timeout".to_string()));

        let mut driver = ScriptedDriver::new(reports);
        let pacer = Pacer::new(Duration::ZERO);
        let mut seen = Vec::new();
        scan_pages(&mut driver, &urls, &quiet_config(), &pacer, |i, outcome| {
            seen.push((i, outcome.is_failure()));
        })
        .await;

        assert_eq!(seen, vec![(0, false), (1, false), (2, true), (3, false)]);
    }

    #[tokio::test]
    async fn test_every_url_is_attempted_despite_failures() {
        let urls: Vec<String> = (0..3)
            .map(|i| format!("https://example.com/p{i}"))
            .collect();
        let reports: HashMap<_, _> = urls
            .iter()
            .map(|u| (u.clone(), Err::<CheckReport, _>("nav:refused".to_string())))
            .collect();

        let mut driver = ScriptedDriver::new(reports);
        let pacer = Pacer::new(Duration::ZERO);
        let outcomes =
            scan_pages(&mut driver, &urls, &quiet_config(), &pacer, |_, _| {}).await;

        assert_eq!(driver.navigations.len(), 3);
        assert!(outcomes.iter().all(|o| o.is_failure()));
    }
}
