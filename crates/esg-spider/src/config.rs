use crate::error::ConfigError;
use crate::esg::de::Strictness;
use crate::http::*;
use crate::pace::{Pacer, DEFAULT_BUDGET};
use deadpool_postgres::{ManagerConfig, PoolConfig, RecyclingMethod, Runtime};
use std::time::Duration;
use tokio_postgres::NoTls;
use tracing::{debug, trace};

/// Run settings, read from the environment (and `.env`).
///
/// | variable             | default                  |
/// |----------------------|--------------------------|
/// | `ESG_API_URL`        | `""`                     |
/// | `ESG_DATABASE_URL`   | required                 |
/// | `ESG_MAX_REQUESTS`   | `100`                    |
/// | `ESG_STRICT`         | `false`                  |
/// | `ESG_HTTP_TIMEOUT`   | `30` (seconds)           |
/// | `USER_AGENT`         | `esg-spider/<version>`   |
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub database_url: String,
    pub budget: u32,
    pub strictness: Strictness,
    pub http_timeout: Duration,
    pub user_agent: String,
}

impl Config {
    /// Read the settings with [dotenv::var], so a `.env` file in the working directory is
    /// honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Read the settings through an arbitrary `key -> value` lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("ESG_DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("ESG_DATABASE_URL"))?;

        let budget = match lookup("ESG_MAX_REQUESTS") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
                key: "ESG_MAX_REQUESTS",
                value: raw,
            })?,
            None => DEFAULT_BUDGET,
        };
        if budget == 0 {
            return Err(ConfigError::ZeroBudget);
        }

        let strictness = match lookup("ESG_STRICT") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Strictness::Strict,
                "0" | "false" | "no" | "" => Strictness::Lenient,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "ESG_STRICT",
                        value: raw,
                    })
                }
            },
            None => Strictness::Lenient,
        };

        let http_timeout = match lookup("ESG_HTTP_TIMEOUT") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    key: "ESG_HTTP_TIMEOUT",
                    value: raw,
                })?,
            None => Duration::from_secs(30),
        };

        Ok(Self {
            api_url: lookup("ESG_API_URL").unwrap_or_default(),
            database_url,
            budget,
            strictness,
            http_timeout,
            user_agent: lookup("USER_AGENT")
                .unwrap_or_else(|| format!("esg-spider/{}", env!("CARGO_PKG_VERSION"))),
        })
    }

    pub fn pacer(&self) -> Result<Pacer, ConfigError> {
        Pacer::new(self.budget)
    }

    pub fn http_client(&self) -> Result<HttpClient, ConfigError> {
        trace!("building http client, timeout {:?}", self.http_timeout);
        Ok(crate::std_client_build(&self.user_agent, self.http_timeout)?)
    }

    /// A single-connection pool; the run never needs two connections at once.
    pub fn pg_pool(&self) -> Result<PgPool, ConfigError> {
        trace!("creating postgres connection pool config");
        let mut pg_config = deadpool_postgres::Config::new();
        pg_config.url = Some(self.database_url.clone());
        pg_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        pg_config.pool = Some(PoolConfig::new(1));

        let pool = pg_config.create_pool(Some(Runtime::Tokio1), NoTls)?;
        debug!("esg_database connection pool created");
        Ok(pool)
    }
}
