//! Inter-request pacing against the target site.
//!
//! The politeness delay is an explicit configured interval, not ambient
//! state: tests inject `Duration::ZERO` and the loop runs undelayed.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum interval between successive requests to one site.
pub struct Pacer {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Sleep until at least the minimum interval has passed since the last
    /// `mark`. First call never waits.
    pub async fn pause(&self) {
        let last = self.last_request.lock().await;
        if let Some(t) = *last {
            let elapsed = t.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                drop(last);
                tokio::time::sleep(remaining).await;
            }
        }
    }

    /// Record that a request to the site just completed.
    pub async fn mark(&self) {
        *self.last_request.lock().await = Some(Instant::now());
    }
}
