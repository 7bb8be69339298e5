//! `prospector doctor` — check the local environment.

use crate::cli::output::Styled;
use crate::scan::rules::RuleScript;
use anyhow::Result;
use chromiumoxide::browser::BrowserConfig;

/// Report whether the pieces a scan needs are present.
pub fn run() -> Result<()> {
    let s = Styled::new();
    let mut healthy = true;

    match RuleScript::load() {
        Ok(_) => eprintln!("  {} rule script (axe-core) found", s.ok_sym()),
        Err(e) => {
            healthy = false;
            eprintln!("  {} {e}", s.fail_sym());
        }
    }

    // Building the config resolves the Chromium executable.
    match BrowserConfig::builder().build() {
        Ok(_) => eprintln!("  {} Chromium executable found", s.ok_sym()),
        Err(e) => {
            healthy = false;
            eprintln!("  {} Chromium not found: {e}", s.fail_sym());
        }
    }

    eprintln!();
    if healthy {
        eprintln!("  {} ready to scan", s.ok_sym());
    } else {
        eprintln!("  {} fix the items above before scanning", s.warn_sym());
    }

    Ok(())
}
