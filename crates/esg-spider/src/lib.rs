pub mod config;
pub mod error;
pub mod esg;
pub mod pace;
pub mod pipeline;

pub use esg::CompanyScore;

/// Shortcut for required API elements.
pub(crate) mod http {
    pub(crate) use deadpool_postgres::Pool as PgPool;
    pub(crate) use reqwest::Client as HttpClient;
}

use colored::Colorize;
use std::time::{Duration, Instant};

/// Build the [`reqwest::Client`] shared by every request of a run.
pub fn std_client_build(user_agent: &str, timeout: Duration) -> reqwest::Result<http::HttpClient> {
    reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

/// Orange "elapsed time: N ms" suffix for debug logs.
pub(crate) fn time_elapsed(time: Instant) -> String {
    format!("elapsed time: {} ms", time.elapsed().as_millis())
        .truecolor(255, 135, 0)
        .to_string()
}
