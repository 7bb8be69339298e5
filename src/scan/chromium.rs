//! Chromium-backed `PageDriver` using chromiumoxide.
//!
//! Owns one headless browser and one page context, reused for every URL
//! in a run. The rule script is injected after each navigation (the page
//! context is reset by navigating) and evaluated in-page.

use super::driver::{CheckReport, PageDriver, RawViolation};
use super::rules::RuleScript;
use crate::aggregate::Severity;
use crate::error::InitError;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// What the in-page evaluation hands back.
#[derive(Debug, Deserialize)]
struct EngineSummary {
    violations: Vec<EngineViolation>,
    passes: u64,
    incomplete: u64,
}

#[derive(Debug, Deserialize)]
struct EngineViolation {
    id: String,
    impact: Option<String>,
    description: String,
    help: String,
    #[serde(rename = "helpUrl")]
    help_url: String,
    nodes: u64,
}

/// A headless Chromium session driving the accessibility rule engine.
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    rules: RuleScript,
    handler_task: tokio::task::JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch the browser and open the single page context for the run.
    pub async fn launch(rules: RuleScript) -> Result<Self, InitError> {
        let config = BrowserConfig::builder()
            .window_size(1280, 800)
            .build()
            .map_err(InitError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| InitError::BrowserLaunch(e.to_string()))?;

        // Drive the CDP event loop for the browser's lifetime.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| InitError::BrowserLaunch(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            rules,
            handler_task,
        })
    }

    /// Close the browser (and with it the page), tearing down the event loop.
    pub async fn close(mut self) {
        self.browser.close().await.ok();
        self.browser.wait().await.ok();
        self.handler_task.abort();
    }

    /// Build the in-page expression running the engine with a tag filter.
    fn run_expression(tags: &[String]) -> Result<String> {
        let tag_json = serde_json::to_string(tags).context("encoding tag filter")?;
        Ok(format!(
            r#"(async () => {{
                if (typeof axe === 'undefined') {{
                    throw new Error('rule engine not present on page');
                }}
                const results = await axe.run(document, {{
                    runOnly: {{ type: 'tag', values: {tag_json} }}
                }});
                return {{
                    violations: results.violations.map(v => ({{
                        id: v.id,
                        impact: v.impact,
                        description: v.description,
                        help: v.help,
                        helpUrl: v.helpUrl,
                        nodes: v.nodes.length,
                    }})),
                    passes: results.passes.length,
                    incomplete: results.incomplete.length,
                }};
            }})()"#
        ))
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let navigation = async {
            self.page
                .goto(url)
                .await
                .with_context(|| format!("navigating to {url}"))?;
            self.page
                .wait_for_navigation()
                .await
                .with_context(|| format!("waiting for load of {url}"))?;
            Ok::<_, anyhow::Error>(())
        };

        tokio::time::timeout(timeout, navigation)
            .await
            .map_err(|_| anyhow!("navigation timed out after {}s", timeout.as_secs()))?
    }

    async fn run_checks(&mut self, tags: &[String]) -> Result<CheckReport> {
        // Navigation resets the page context, so the script goes in fresh
        // every time.
        let inject = EvaluateParams::builder()
            .expression(self.rules.source().to_string())
            .return_by_value(false)
            .build()
            .map_err(|e| anyhow!("building injection params: {e}"))?;
        self.page
            .evaluate(inject)
            .await
            .context("injecting rule script")?;

        let run = EvaluateParams::builder()
            .expression(Self::run_expression(tags)?)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(|e| anyhow!("building evaluation params: {e}"))?;
        let evaluation = self
            .page
            .evaluate(run)
            .await
            .context("evaluating accessibility rules")?;

        let summary: EngineSummary = evaluation
            .into_value()
            .context("decoding rule engine output")?;

        Ok(convert_summary(summary))
    }
}

/// Map raw engine output into the driver report, parsing impact tokens.
fn convert_summary(summary: EngineSummary) -> CheckReport {
    let violations = summary
        .violations
        .into_iter()
        .map(|v| {
            let severity = v
                .impact
                .as_deref()
                .and_then(Severity::from_token)
                .unwrap_or_else(|| {
                    debug!("unknown impact token on rule {}, treating as minor", v.id);
                    Severity::Minor
                });
            RawViolation {
                rule_id: v.id,
                severity,
                description: v.description,
                help: v.help,
                help_url: v.help_url,
                nodes: v.nodes.max(1),
            }
        })
        .collect();

    CheckReport {
        violations,
        passes: summary.passes,
        incomplete: summary.incomplete,
    }
}
