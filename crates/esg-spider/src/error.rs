use thiserror::Error;

/// Failure to retrieve a response body from the scores API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (bad URL, DNS, refused connection, timeout).
    #[error("request to \"{url}\" failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code.
    #[error("unexpected response status {status} from \"{url}\"")]
    Status { status: u16, url: String },

    /// The response body could not be read as text.
    #[error("failed to read response body from \"{url}\": {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Failure to turn a response body into company scores.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response has no \"companies\" field")]
    MissingCompanies,

    #[error("\"companies\" is not an array")]
    NotAnArray,
}

/// Failure to reach or query the scores table.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to acquire a database connection: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: \"{value}\"")]
    Invalid { key: &'static str, value: String },

    #[error("request budget must be at least 1")]
    ZeroBudget,

    #[error("failed to build the database pool: {0}")]
    Pool(#[from] deadpool_postgres::CreatePoolError),

    #[error("failed to build the http client: {0}")]
    Http(#[from] reqwest::Error),
}
