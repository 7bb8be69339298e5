//! The browser-automation / rule-engine capability seam.
//!
//! The orchestrator only ever talks to a `PageDriver`: navigate the shared
//! page context somewhere, then run the accessibility checks on whatever is
//! loaded. The chromiumoxide implementation lives in `chromium`; tests use
//! scripted fakes.

use crate::aggregate::Severity;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// One rule failure as reported by the engine, not yet tied to a page.
#[derive(Debug, Clone)]
pub struct RawViolation {
    pub rule_id: String,
    pub severity: Severity,
    pub description: String,
    pub help: String,
    pub help_url: String,
    /// Affected DOM node count.
    pub nodes: u64,
}

/// Everything the rule engine reports for one evaluated page.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub violations: Vec<RawViolation>,
    pub passes: u64,
    pub incomplete: u64,
}

/// A persistent page context that can be pointed at URLs and evaluated.
///
/// Implementations own exactly one page context for the run's duration;
/// the orchestrator never navigates it concurrently.
#[async_trait]
pub trait PageDriver: Send {
    /// Navigate the shared page context to `url`. Success means the page
    /// load event was reached, not that async content has settled.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Run the accessibility checks on the currently loaded page, scoped
    /// to the given guideline tag families.
    async fn run_checks(&mut self, tags: &[String]) -> Result<CheckReport>;
}
