//! Filter discovered URLs down to scannable HTML pages.
//!
//! Classification is by file-extension suffix against a fixed deny-list of
//! binary and document resource types. Survivors keep their original order
//! and are truncated to the page cap; order determines scan sequence and
//! therefore partial-run coverage.

/// Extensions that are never HTML pages.
const DENY_EXTENSIONS: &[&str] = &[
    // Documents
    ".pdf", ".doc", ".docx", ".ppt", ".pptx", ".rtf", ".txt",
    // Spreadsheets
    ".xls", ".xlsx", ".csv",
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".ico",
    // Media
    ".mp4", ".mp3", ".webm", ".avi", ".mov",
    // Archives
    ".zip", ".gz", ".tar", ".rar", ".7z",
    // Non-page resources
    ".css", ".js", ".xml", ".json",
];

/// Result of filtering a candidate URL set.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// URLs to scan, in original order, at most the page cap.
    pub urls: Vec<String>,
    /// How many URLs were discovered before filtering.
    pub discovered: usize,
    /// How many survived the deny-list (before the cap).
    pub retained: usize,
}

/// Keep scannable page URLs, preserving order, truncated to `max_pages`.
pub fn filter_scannable(candidates: &[String], max_pages: usize) -> FilterOutcome {
    let discovered = candidates.len();

    let survivors: Vec<String> = candidates
        .iter()
        .filter(|url| !is_denied(url))
        .cloned()
        .collect();
    let retained = survivors.len();

    let mut urls = survivors;
    urls.truncate(max_pages);

    FilterOutcome {
        urls,
        discovered,
        retained,
    }
}

/// Whether a URL's path ends in a denied extension.
fn is_denied(url: &str) -> bool {
    let path = extract_path(url);
    // Ignore query and fragment when matching the suffix.
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let path = path.to_lowercase();

    DENY_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Path portion of a URL, without parsing the full URL.
fn extract_path(url: &str) -> &str {
    if let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    {
        if let Some(slash_pos) = rest.find('/') {
            return &rest[slash_pos..];
        }
        return "/";
    }
    url
}
