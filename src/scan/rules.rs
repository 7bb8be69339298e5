//! Locate and hold the accessibility rule-engine script (axe-core).
//!
//! The script is injected into every audited page. It is looked up on
//! disk at startup; a scan without a rule engine would report every site
//! as clean, so a missing script is a fatal initialization failure rather
//! than something to paper over with a stub.

use crate::error::InitError;
use std::path::PathBuf;
use tracing::info;

const SCRIPT_NAME: &str = "axe.min.js";

/// Environment variable overriding the script location.
pub const SCRIPT_PATH_ENV: &str = "PROSPECTOR_AXE_PATH";

/// The loaded rule-engine script source.
pub struct RuleScript {
    source: String,
}

impl RuleScript {
    /// Load the script from the first location that exists.
    ///
    /// Search order: the `PROSPECTOR_AXE_PATH` env var, `assets/` and
    /// `vendor/` under the working directory, then the crate's own
    /// `assets/` directory.
    pub fn load() -> Result<Self, InitError> {
        let mut search_paths = Vec::new();

        if let Ok(p) = std::env::var(SCRIPT_PATH_ENV) {
            search_paths.push(PathBuf::from(p));
        }
        search_paths.push(PathBuf::from("assets").join(SCRIPT_NAME));
        search_paths.push(PathBuf::from("vendor").join(SCRIPT_NAME));
        search_paths.push(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("assets")
                .join(SCRIPT_NAME),
        );

        for path in &search_paths {
            if path.is_file() {
                if let Ok(source) = std::fs::read_to_string(path) {
                    info!("loaded rule script from {}", path.display());
                    return Ok(Self { source });
                }
            }
        }

        let searched = search_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(InitError::RuleScriptMissing { searched })
    }

    /// Wrap an already-loaded script source.
    pub fn from_source(source: String) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
