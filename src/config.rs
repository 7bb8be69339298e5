//! Scan configuration with fixed policy defaults.

use std::time::Duration;

/// Default page cap when the operator does not supply one.
pub const DEFAULT_MAX_PAGES: usize = 10;

/// WCAG tag families the rule engine is scoped to.
pub const WCAG_TAGS: &[&str] = &["wcag2a", "wcag2aa", "wcag21a", "wcag21aa"];

/// Configuration for one scan run.
///
/// Only `max_pages` is operator-facing; the remaining fields are fixed
/// policy, threaded through explicitly so tests can inject zero delays.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum number of pages to audit.
    pub max_pages: usize,
    /// Navigation timeout per page.
    pub nav_timeout: Duration,
    /// Delay after navigation before evaluating, letting deferred
    /// script-driven content finish mutating the page.
    pub settle_delay: Duration,
    /// Minimum interval between successive requests to the target site.
    pub politeness_delay: Duration,
    /// Timeout for each sitemap/robots probe.
    pub probe_timeout: Duration,
    /// Rule engine tag filter.
    pub tags: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            nav_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(3),
            politeness_delay: Duration::from_secs(1),
            probe_timeout: Duration::from_secs(10),
            tags: WCAG_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ScanConfig {
    /// Config with the given page cap and default policy otherwise.
    pub fn with_max_pages(max_pages: usize) -> Self {
        Self {
            max_pages,
            ..Self::default()
        }
    }

    /// Zero out all delays. For tests against local fixtures.
    pub fn without_delays(mut self) -> Self {
        self.settle_delay = Duration::ZERO;
        self.politeness_delay = Duration::ZERO;
        self
    }
}
