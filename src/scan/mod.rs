//! Page auditing: the browser/rule-engine seam and the sequential
//! orchestration loop that drives it.

pub mod chromium;
pub mod driver;
pub mod orchestrator;
pub mod pacer;
pub mod rules;
