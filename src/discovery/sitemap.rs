//! Sitemap discovery with ordered probing and fallback.
//!
//! Probes a fixed list of conventional sitemap locations under the site
//! root. The first location that yields a non-empty, parseable URL list
//! wins; every kind of failure at a location (network error, timeout,
//! malformed XML, empty document) just advances to the next. If the whole
//! list is exhausted, falls back to the root URL alone.

use super::http_client::HttpClient;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Conventional sitemap locations, probed in order.
const SITEMAP_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap/sitemap.xml",
    "/wp-sitemap.xml",
];

/// Child sitemaps followed per index document.
const MAX_INDEX_CHILDREN: usize = 10;

/// URLs collected per probed location.
const MAX_URLS: usize = 500;

/// Where a candidate URL set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// A probed sitemap location yielded the URLs.
    Sitemap,
    /// No sitemap found anywhere; the set is just the root URL.
    Fallback,
}

/// The candidate URL set discovered for one site.
#[derive(Debug, Clone)]
pub struct DiscoveredUrls {
    pub urls: Vec<String>,
    pub provenance: Provenance,
}

/// Discover candidate page URLs for a site root.
///
/// Never fails: exhausting every probe location produces the fallback set
/// containing only the root URL itself.
pub async fn discover(root: &Url, client: &HttpClient, probe_timeout: Duration) -> DiscoveredUrls {
    let base = root_base(root);

    for path in SITEMAP_PATHS {
        let probe_url = format!("{base}{path}");
        match probe_location(&probe_url, client, probe_timeout).await {
            Some(urls) if !urls.is_empty() => {
                info!("sitemap found at {probe_url} ({} URLs)", urls.len());
                return DiscoveredUrls {
                    urls,
                    provenance: Provenance::Sitemap,
                };
            }
            _ => {
                debug!("no sitemap at {probe_url}");
            }
        }
    }

    info!("no sitemap found for {base}, falling back to root URL");
    DiscoveredUrls {
        urls: vec![root.as_str().to_string()],
        provenance: Provenance::Fallback,
    }
}

/// Probe one location. `None` means "not found here" for any reason.
async fn probe_location(
    probe_url: &str,
    client: &HttpClient,
    timeout: Duration,
) -> Option<Vec<String>> {
    let resp = client.get(probe_url, timeout).await.ok()?;
    if !resp.is_success() {
        return None;
    }

    match parse_sitemap(&resp.body) {
        SitemapDoc::Pages(urls) => Some(urls),
        SitemapDoc::Index(children) => {
            // Follow index entries one level deep, concatenating children.
            let mut urls = Vec::new();
            for child in children.iter().take(MAX_INDEX_CHILDREN) {
                if let Ok(resp) = client.get(child, timeout).await {
                    if resp.is_success() {
                        if let SitemapDoc::Pages(mut pages) = parse_sitemap(&resp.body) {
                            urls.append(&mut pages);
                            if urls.len() >= MAX_URLS {
                                urls.truncate(MAX_URLS);
                                break;
                            }
                        }
                    }
                }
            }
            Some(urls)
        }
        SitemapDoc::NotSitemap => None,
    }
}

/// Scheme + host (+ port) of the root URL, without a trailing slash.
fn root_base(root: &Url) -> String {
    let mut base = format!("{}://{}", root.scheme(), root.host_str().unwrap_or_default());
    if let Some(port) = root.port() {
        base.push_str(&format!(":{port}"));
    }
    base
}

/// A parsed sitemap document.
#[derive(Debug)]
enum SitemapDoc {
    /// A `<urlset>` of page URLs.
    Pages(Vec<String>),
    /// A `<sitemapindex>` of nested sitemap URLs.
    Index(Vec<String>),
    /// Not recognizably a sitemap.
    NotSitemap,
}

/// Parse sitemap XML, accepting both `<urlset>` and `<sitemapindex>`.
fn parse_sitemap(xml: &str) -> SitemapDoc {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut is_index = false;
    let mut saw_root = false;
    let mut in_loc = false;
    let mut locs = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(ref e)) => {
                match local_name(e.name().as_ref()).as_str() {
                    "urlset" => saw_root = true,
                    "sitemapindex" => {
                        saw_root = true;
                        is_index = true;
                    }
                    "loc" => in_loc = true,
                    _ => {}
                }
            }
            Ok(quick_xml::events::Event::Text(ref e)) => {
                if in_loc {
                    let text = e.unescape().unwrap_or_default();
                    let trimmed = text.trim();
                    if !trimmed.is_empty() && locs.len() < MAX_URLS {
                        locs.push(trimmed.to_string());
                    }
                }
            }
            Ok(quick_xml::events::Event::End(ref e)) => {
                if local_name(e.name().as_ref()) == "loc" {
                    in_loc = false;
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return SitemapDoc::NotSitemap;
    }
    if is_index {
        SitemapDoc::Index(locs)
    } else {
        SitemapDoc::Pages(locs)
    }
}

/// Element name with any namespace prefix stripped.
fn local_name(raw: &[u8]) -> String {
    let s = String::from_utf8_lossy(raw);
    s.rsplit(':').next().unwrap_or(&s).to_string()
}
