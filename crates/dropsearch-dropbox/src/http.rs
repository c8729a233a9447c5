//! HTTP plumbing shared by the Dropbox clients

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use dropsearch_core::{ProviderError, ProviderResult};

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl HttpClient {
    pub fn new(max_retries: u32, retry_delay_ms: u64) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ProviderError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_retries,
            retry_delay_ms,
        })
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Execute a request, retrying transport failures, 5xx and 429
    pub async fn execute_with_retry(
        &self,
        request_builder: reqwest::RequestBuilder,
    ) -> ProviderResult<reqwest::Response> {
        let mut last_error = None;
        let mut retry_after = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = retry_after
                    .take()
                    .unwrap_or_else(|| backoff_delay(self.retry_delay_ms, attempt));
                debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying Dropbox request");
                tokio::time::sleep(delay).await;
            }

            let Some(rb) = request_builder.try_clone() else {
                return Err(ProviderError::transport("Request cannot be cloned for retry"));
            };

            match rb.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        retry_after = parse_retry_after(response.headers());
                    } else if status.is_client_error() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(ProviderError::Api {
                            status: status.as_u16(),
                            summary: error_summary(&body),
                        });
                    }

                    last_error = Some(format!("HTTP {}", status));
                }
                Err(e) => {
                    warn!("Dropbox request failed: {}", e);
                    last_error = Some(e.to_string());
                }
            }
        }

        Err(ProviderError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error: last_error.unwrap_or_default(),
        })
    }
}

/// Exponential backoff: `base * 2^(attempt - 1)`
pub(crate) fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(base_ms.saturating_mul(factor))
}

/// Dropbox sends `Retry-After` in whole seconds on rate-limited responses
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_summary: String,
}

/// Human-readable summary of a Dropbox error response body
pub(crate) fn error_summary(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error_summary,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// One page of a cursor-paginated listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// Helper to collect all pages of a cursor-paginated listing
///
/// The first call receives `None`; every later call receives the cursor of
/// the previous page. Any page failure fails the whole listing.
pub async fn collect_all_pages<T, F, Fut>(fetch_page: F) -> ProviderResult<Vec<T>>
where
    F: Fn(Option<String>) -> Fut,
    Fut: Future<Output = ProviderResult<Page<T>>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;

    loop {
        let page = fetch_page(cursor.take()).await?;
        all_items.extend(page.items);

        if !page.has_more {
            break;
        }

        match page.cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => {
                return Err(ProviderError::invalid_response(
                    "Listing reported more results without a cursor",
                ))
            }
        }
    }

    Ok(all_items)
}
