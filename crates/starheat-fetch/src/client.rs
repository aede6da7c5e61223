use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::error::FetchError;

/// HTTP statuses treated as transient and retried with backoff. Any other
/// status — success or permanent failure — is returned to the caller on the
/// attempt that produced it.
pub const RETRYABLE_STATUS: [u16; 5] = [429, 500, 502, 503, 504];

/// Outbound HTTP client with bounded retry and exponential backoff.
///
/// `get` makes at most `max_attempts` tries. A transport-level failure or a
/// status in [`RETRYABLE_STATUS`] triggers a retry after
/// `backoff_base_secs ^ attempt` seconds; every other status short-circuits.
/// On exhaustion the last response obtained is returned, or `None` when every
/// attempt failed at transport level.
pub struct FetchClient {
    client: Client,
    max_attempts: u32,
    backoff_base_secs: u64,
}

impl FetchClient {
    /// Create a client with the given timeout, `User-Agent`, and retry policy.
    ///
    /// `max_attempts` counts the first try; it is clamped to at least 1.
    /// `backoff_base_secs = 0` disables the inter-attempt sleep (used by
    /// tests).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_attempts: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_attempts: max_attempts.max(1),
            backoff_base_secs,
        })
    }

    /// Issue a GET request with query parameters.
    ///
    /// Never fails: transient failures are retried up to `max_attempts`
    /// total tries, permanent statuses (including 404) come back on the
    /// first attempt that produced them, and full transport-level exhaustion
    /// yields `None`. Callers interpret the status of whatever response they
    /// receive.
    pub async fn get(&self, url: &str, params: &[(&str, &str)]) -> Option<Response> {
        let mut last: Option<Response> = None;

        for attempt in 0..self.max_attempts {
            match self.client.get(url).query(params).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() || !is_retryable(status) {
                        return Some(response);
                    }
                    tracing::warn!(
                        url,
                        attempt,
                        status = status.as_u16(),
                        "transient HTTP status — retrying after backoff"
                    );
                    last = Some(response);
                }
                Err(e) => {
                    tracing::warn!(url, attempt, error = %e, "transport failure — retrying after backoff");
                    last = None;
                }
            }

            if attempt + 1 < self.max_attempts {
                let delay = self.backoff_secs(attempt);
                if delay > 0 {
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                }
            }
        }

        last
    }

    /// `get` plus a 200-status check plus a JSON body parse.
    ///
    /// Any failure along the way — no response, non-200 status, unparsable
    /// body — yields `None`.
    pub async fn get_json(&self, url: &str, params: &[(&str, &str)]) -> Option<serde_json::Value> {
        let response = self.get(url, params).await?;
        if response.status() != StatusCode::OK {
            return None;
        }
        response.json().await.ok()
    }

    /// `get` plus a 200-status check plus a body read as text.
    pub async fn get_text(&self, url: &str, params: &[(&str, &str)]) -> Option<String> {
        let response = self.get(url, params).await?;
        if response.status() != StatusCode::OK {
            return None;
        }
        response.text().await.ok()
    }

    fn backoff_secs(&self, attempt: u32) -> u64 {
        if self.backoff_base_secs == 0 {
            return 0;
        }
        // base ^ attempt: 1 s, 2 s, 4 s with the default base of 2.
        self.backoff_base_secs.saturating_pow(attempt)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    RETRYABLE_STATUS.contains(&status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_set_matches_contract() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_retryable(StatusCode::from_u16(status).unwrap()));
        }
        for status in [200, 301, 400, 403, 404, 410] {
            assert!(!is_retryable(StatusCode::from_u16(status).unwrap()));
        }
    }

    #[test]
    fn backoff_grows_exponentially_from_one() {
        let client = FetchClient::new(5, "test", 4, 2).unwrap();
        assert_eq!(client.backoff_secs(0), 1);
        assert_eq!(client.backoff_secs(1), 2);
        assert_eq!(client.backoff_secs(2), 4);
    }

    #[test]
    fn zero_base_disables_backoff() {
        let client = FetchClient::new(5, "test", 4, 0).unwrap();
        assert_eq!(client.backoff_secs(0), 0);
        assert_eq!(client.backoff_secs(3), 0);
    }

    #[test]
    fn max_attempts_is_clamped_to_one() {
        let client = FetchClient::new(5, "test", 0, 0).unwrap();
        assert_eq!(client.max_attempts, 1);
    }
}
