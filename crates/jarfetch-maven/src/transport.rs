//! HTTP transport seam.
//!
//! The resolver engine only ever talks to a [`Transport`]; the production
//! implementation streams over reqwest with retries, tests substitute an
//! in-memory double.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::TransportError;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Byte-level GET access to repository URLs.
///
/// `Ok(None)` means 404: the document does not exist in that repository.
/// Timeouts and DNS failures surface as [`TransportError::Connectivity`] so
/// the resolver can move on to the next repository.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Option<Vec<u8>>, TransportError>;
}

/// Production transport backed by a shared reqwest client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> jarfetch_util::errors::JarfetchResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("jarfetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| jarfetch_util::errors::JarfetchError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    /// GET `url` with retries on timeout, refused connection, and 5xx.
    async fn get(&self, url: &str) -> Result<Option<Vec<u8>>, TransportError> {
        let mut last_err = String::new();

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                tokio::time::sleep(RETRY_DELAY * attempt).await;
            }

            match self.client.get(url).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Ok(None);
                    }
                    if status.is_server_error() {
                        last_err = format!("HTTP {status} from {url}");
                        continue;
                    }
                    if !status.is_success() {
                        return Err(TransportError::Http {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    }

                    let bytes = resp.bytes().await.map_err(|e| TransportError::Request {
                        url: url.to_string(),
                        message: format!("failed to read response body: {e}"),
                    })?;
                    return Ok(Some(bytes.to_vec()));
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    last_err = format!("{e}");
                    continue;
                }
                Err(e) => {
                    return Err(TransportError::Request {
                        url: url.to_string(),
                        message: format!("{e}"),
                    });
                }
            }
        }

        Err(TransportError::Connectivity {
            url: url.to_string(),
            message: format!("failed after {MAX_RETRIES} retries: {last_err}"),
        })
    }
}
