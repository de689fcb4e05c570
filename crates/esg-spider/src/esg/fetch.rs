use crate::error::FetchError;
use crate::http::*;
use std::future::Future;
use tracing::trace;

/// Anything that yields one scores payload per call.
pub trait Source {
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Plain, unauthenticated GET against a fixed URL.
#[derive(Clone, Debug)]
pub struct HttpSource {
    http_client: HttpClient,
    url: String,
}

impl HttpSource {
    pub fn new(http_client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Source for HttpSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        trace!("fetching ESG scores from \"{}\"", self.url);
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: self.url.clone(),
            source,
        })
    }
}
