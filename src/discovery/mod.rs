//! Page discovery: sitemap probing, robots.txt, and URL filtering.

pub mod filter;
pub mod http_client;
pub mod robots;
pub mod sitemap;
