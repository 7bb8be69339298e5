//! Fatal initialization errors.
//!
//! Everything else in the pipeline is absorbed into data (fallback tags,
//! failure outcomes); only these abort a run before any page is attempted.

use thiserror::Error;

/// Errors that prevent a scan run from starting at all.
#[derive(Debug, Error)]
pub enum InitError {
    /// The root URL could not be parsed as an absolute http(s) URL.
    #[error("invalid site URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The browser session could not be started.
    #[error("failed to launch browser session: {0}")]
    BrowserLaunch(String),

    /// The HTTP client for discovery probes could not be built.
    #[error("failed to initialize HTTP client: {0}")]
    HttpClient(String),

    /// The accessibility rule script could not be located.
    #[error("rule engine script not found (looked in {searched}); set PROSPECTOR_AXE_PATH")]
    RuleScriptMissing { searched: String },
}
