//! robots.txt crawl-delay lookup.
//!
//! The politeness delay between page requests is configured policy; a site
//! that declares a larger `Crawl-delay` in robots.txt gets the larger value.
//! The declared delay never lowers the configured one.

use super::http_client::HttpClient;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Fetch robots.txt and return the crawl delay declared for us (or `*`).
///
/// Any failure (missing file, network error, unparseable content) means
/// "no declared delay"; robots.txt problems are never fatal.
pub async fn crawl_delay(root: &Url, client: &HttpClient, timeout: Duration) -> Option<Duration> {
    let mut robots_url = format!(
        "{}://{}",
        root.scheme(),
        root.host_str().unwrap_or_default()
    );
    if let Some(port) = root.port() {
        robots_url.push_str(&format!(":{port}"));
    }
    robots_url.push_str("/robots.txt");

    let resp = client.get(&robots_url, timeout).await.ok()?;
    if !resp.is_success() {
        return None;
    }

    let delay = parse_crawl_delay(&resp.body, "prospector")?;
    debug!("robots.txt declares crawl-delay {delay:?}");
    Some(delay)
}

/// Pick the effective pacing interval: the larger of the configured delay
/// and whatever robots.txt declares.
pub fn effective_delay(configured: Duration, declared: Option<Duration>) -> Duration {
    match declared {
        Some(d) if d > configured => d,
        _ => configured,
    }
}

/// Parse the `Crawl-delay` directive for a user agent out of robots.txt.
///
/// Directives in a `User-agent` group matching `user_agent` or `*` apply;
/// directives before any group line are treated as global.
fn parse_crawl_delay(txt: &str, user_agent: &str) -> Option<Duration> {
    let ua_lower = user_agent.to_lowercase();
    let mut in_matching_group = false;
    let mut found_matching_group = false;
    let mut delay = None;

    for line in txt.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.split('#').next().unwrap_or("").trim();

        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    let ua = value.to_lowercase();
                    in_matching_group = ua == "*" || ua == ua_lower;
                    if in_matching_group {
                        found_matching_group = true;
                    }
                }
                "crawl-delay" if in_matching_group || !found_matching_group => {
                    if let Ok(secs) = value.parse::<f32>() {
                        if secs >= 0.0 {
                            delay = Some(Duration::from_millis((secs * 1000.0) as u64));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    delay
}
