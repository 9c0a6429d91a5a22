//! HTTP retry helper for transient provider errors.
//!
//! Provider adapters call [`send_json`] instead of
//! `reqwest::RequestBuilder::send()` directly, so every request gets retry
//! with exponential backoff on connection failures, timeouts, HTTP 429,
//! and HTTP 5xx. Other 4xx responses are permanent and returned at once.
//!
//! ```ignore
//! let body = retry::send_json(&policy, || client.get(&url).query(&params)).await?;
//! ```

use std::time::Duration;

use crate::PlacesError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 300;

/// How often and how patiently to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (1-based): base, 2×base, 4×base…
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << shift)
    }
}

/// Sends an HTTP request and parses the response body as JSON.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`] (builders are consumed by `.send()`).
///
/// # Errors
///
/// Returns [`PlacesError`] if the request fails after all retries, the
/// server returns a non-retryable status, or the body is not JSON.
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(
    policy: &RetryPolicy,
    build_request: F,
) -> Result<serde_json::Value, PlacesError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(policy, &build_request).await?;
    let status = response.status();
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|e| {
        let preview: String = text.chars().take(BODY_PREVIEW_LEN).collect();
        log::error!("JSON parse failed (status {status}): {e}\n  body preview: {preview}");
        PlacesError::Parse {
            message: format!("JSON parse failed: {e} (status={status}, {} bytes)", text.len()),
        }
    })
}

/// Core retry loop. Returns the first successful (2xx/3xx) response.
#[allow(clippy::future_not_send)]
async fn send_inner<F>(
    policy: &RetryPolicy,
    build_request: &F,
) -> Result<reqwest::Response, PlacesError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let max_retries = policy.max_retries;
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = policy.delay_for(attempt);
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        let retries_left = attempt < max_retries;
        attempt += 1;

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && retries_left {
                    log::warn!("  transient error: {e}");
                    continue;
                }
                if e.is_timeout() {
                    return Err(PlacesError::Timeout {
                        operation: e.url().map_or_else(
                            || "provider request".to_string(),
                            |u| u.path().to_string(),
                        ),
                    });
                }
                return Err(PlacesError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    if retries_left {
                        log::warn!("  HTTP 429 (rate limited)");
                        continue;
                    }
                    return Err(PlacesError::RateLimited);
                }

                if status.is_server_error() {
                    if retries_left {
                        log::warn!("  HTTP {status} (server error)");
                        continue;
                    }
                    return Err(PlacesError::Status {
                        status: format!("HTTP {}", status.as_u16()),
                        message: format!("server error after {max_retries} retries"),
                    });
                }

                if status.is_client_error() {
                    return Err(PlacesError::Status {
                        status: format!("HTTP {}", status.as_u16()),
                        message: status.canonical_reason().unwrap_or_default().to_string(),
                    });
                }

                return Ok(response);
            }
        }
    }
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3), Duration::from_secs(2));
    }
}
