//! Prospector — accessibility lead scanner.
//!
//! Discovers a site's pages through its sitemap, audits each page with an
//! accessibility rule engine driven through a headless browser, aggregates
//! the findings into a sealed profile, and grades the site as a lead.
//!
//! The pipeline runs strictly left to right: root URL → candidate URLs →
//! filtered URLs → per-page outcomes → audit profile → grade. Per-page
//! failures are recorded as data; only initialization problems (bad URL,
//! no browser, no rule script) are fatal.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod report;
pub mod scan;

pub use aggregate::grade::{grade, LeadGrade};
pub use aggregate::{AuditProfile, PageOutcome};
pub use config::ScanConfig;
pub use discovery::sitemap::Provenance;
pub use error::InitError;

use discovery::http_client::HttpClient;
use discovery::{filter, robots, sitemap};
use scan::chromium::ChromiumDriver;
use scan::orchestrator::scan_pages;
use scan::pacer::Pacer;
use scan::rules::RuleScript;
use tracing::{info, warn};
use url::Url;

/// Everything a completed run hands to callers and renderers.
#[derive(Debug)]
pub struct ScanReport {
    pub profile: AuditProfile,
    pub grade: LeadGrade,
    pub provenance: Provenance,
    pub urls_discovered: usize,
    pub urls_retained: usize,
}

/// Progress notifications emitted while a run executes.
pub enum ScanEvent<'a> {
    /// Discovery and filtering finished; scanning is about to start.
    Discovered {
        discovered: usize,
        retained: usize,
        scanning: usize,
        provenance: Provenance,
    },
    /// One page outcome was recorded.
    PageDone {
        index: usize,
        total: usize,
        outcome: &'a PageOutcome,
    },
}

/// Run a full audit for one site.
///
/// Fatal only on initialization problems; a run that starts always
/// completes with a profile and grade, whatever the pages did.
pub async fn audit_site(site_url: &str, config: &ScanConfig) -> Result<ScanReport, InitError> {
    audit_site_with_progress(site_url, config, |_| {}).await
}

/// [`audit_site`] with a progress callback for interactive frontends.
pub async fn audit_site_with_progress(
    site_url: &str,
    config: &ScanConfig,
    mut on_event: impl FnMut(ScanEvent<'_>),
) -> Result<ScanReport, InitError> {
    let root = parse_root(site_url)?;
    let site = root.host_str().unwrap_or(site_url).to_string();

    let client = HttpClient::new().map_err(|e| InitError::HttpClient(format!("{e:#}")))?;
    let rules = RuleScript::load()?;
    let mut driver = ChromiumDriver::launch(rules).await?;

    info!("starting audit of {site}");

    let discovered = sitemap::discover(&root, &client, config.probe_timeout).await;
    let filtered = filter::filter_scannable(&discovered.urls, config.max_pages);
    info!(
        "discovered {} URLs, scanning {} of {} retained",
        filtered.discovered,
        filtered.urls.len(),
        filtered.retained
    );
    on_event(ScanEvent::Discovered {
        discovered: filtered.discovered,
        retained: filtered.retained,
        scanning: filtered.urls.len(),
        provenance: discovered.provenance,
    });

    let declared = robots::crawl_delay(&root, &client, config.probe_timeout).await;
    let pace = robots::effective_delay(config.politeness_delay, declared);
    if pace > config.politeness_delay {
        info!("robots.txt raised the politeness delay to {pace:?}");
    }
    let pacer = Pacer::new(pace);

    let total = filtered.urls.len();
    let outcomes = scan_pages(&mut driver, &filtered.urls, config, &pacer, |index, outcome| {
        on_event(ScanEvent::PageDone {
            index,
            total,
            outcome,
        });
    })
    .await;

    driver.close().await;

    let profile = AuditProfile::from_outcomes(&site, &outcomes);
    let grade = aggregate::grade::grade(&profile);
    if profile.is_indeterminate() {
        warn!("no pages could be scanned; grade {grade} reflects missing data");
    }

    Ok(ScanReport {
        profile,
        grade,
        provenance: discovered.provenance,
        urls_discovered: filtered.discovered,
        urls_retained: filtered.retained,
    })
}

/// Validate the operator-supplied root URL.
fn parse_root(site_url: &str) -> Result<Url, InitError> {
    let parsed = Url::parse(site_url).map_err(|e| InitError::InvalidUrl {
        url: site_url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(InitError::InvalidUrl {
            url: site_url.to_string(),
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(InitError::InvalidUrl {
            url: site_url.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(parsed)
}
