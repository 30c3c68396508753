//! HTTP client construction and the retry policy shared by every provider.
//!
//! Each provider call goes through [`send_with_retry`], which applies the
//! configured timeout, retries transient failures with exponential backoff and
//! surfaces exhaustion as [`ScoutError::ProviderUnavailable`].

use crate::config::HttpSettings;
use crate::error::{Result, ScoutError};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest response body excerpt kept in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Create an HTTP client with the configured timeout and user agent.
pub fn build_client(settings: &HttpSettings) -> Result<Client> {
    Client::builder()
        .timeout(settings.timeout())
        .user_agent(settings.user_agent.clone())
        .build()
        .map_err(|e| ScoutError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Retry behavior for provider calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&HttpSettings::default())
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &HttpSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
            max_backoff: Duration::from_millis(settings.max_backoff_ms),
            multiplier: settings.backoff_multiplier.max(1.0),
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff before retry number `attempt` (0-indexed).
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_ms =
            self.initial_backoff.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        Duration::from_millis(backoff_ms as u64).min(self.max_backoff)
    }
}

/// Outcome of a single failed attempt.
#[derive(Debug)]
pub enum AttemptError {
    /// Worth retrying (timeouts, connection resets, 429, 5xx).
    Transient(String),
    /// Returned to the caller immediately.
    Fatal(ScoutError),
}

/// Run `operation` until it succeeds, fails fatally, or retries run out.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, provider: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("{} succeeded on attempt {}", provider, attempt + 1);
                }
                return Ok(value);
            }
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::Transient(message)) => {
                if attempt >= policy.max_retries {
                    return Err(ScoutError::ProviderUnavailable {
                        provider: provider.to_string(),
                        attempts: attempt + 1,
                        message,
                    });
                }
                let backoff = policy.backoff_for_attempt(attempt);
                warn!(
                    "{} failed (attempt {}): {}. Retrying in {:?}",
                    provider,
                    attempt + 1,
                    message,
                    backoff
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}

/// Send a request built by `make_request`, retrying transient failures.
///
/// `make_request` is called once per attempt since a `RequestBuilder` is
/// consumed by sending.
pub async fn send_with_retry<F>(
    policy: &RetryPolicy,
    provider: &str,
    mut make_request: F,
) -> Result<Response>
where
    F: FnMut() -> RequestBuilder,
{
    retry(policy, provider, || {
        let request = make_request();
        async move {
            let response = request.send().await.map_err(classify_transport_error)?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            let message = excerpt(&body);
            if is_retryable_status(status) {
                Err(AttemptError::Transient(format!("HTTP {}: {}", status, message)))
            } else {
                Err(AttemptError::Fatal(ScoutError::Provider {
                    provider: provider.to_string(),
                    status: status.as_u16(),
                    message,
                }))
            }
        }
    })
    .await
}

/// Send a request and decode the JSON body into `T`.
pub async fn get_json<T, F>(policy: &RetryPolicy, provider: &str, make_request: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnMut() -> RequestBuilder,
{
    let response = send_with_retry(policy, provider, make_request).await?;
    let body = response.text().await?;
    decode_body(provider, &body)
}

/// Decode a JSON body; a body that does not fit `T` is a `Decode` error.
pub fn decode_body<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ScoutError::decode(provider, e.to_string()))
}

/// Send a request and return the body as text.
pub async fn get_text<F>(policy: &RetryPolicy, provider: &str, make_request: F) -> Result<String>
where
    F: FnMut() -> RequestBuilder,
{
    let response = send_with_retry(policy, provider, make_request).await?;
    Ok(response.text().await?)
}

fn classify_transport_error(e: reqwest::Error) -> AttemptError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        AttemptError::Transient(e.to_string())
    } else {
        AttemptError::Fatal(ScoutError::Http(e))
    }
}

/// 429 and 5xx are retried; everything else is final.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_BODY_LIMIT {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(ERROR_BODY_LIMIT).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            multiplier: 2.0,
        }
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for_attempt(0), Duration::from_millis(500));
        assert_eq!(policy.backoff_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(policy.backoff_for_attempt(20), Duration::from_secs(30));
    }

    #[test]
    fn test_retryable_status() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failure() {
        let calls = AtomicU32::new(0);
        let result = retry(&fast_policy(3), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(AttemptError::Transient("reset".to_string()))
                } else {
                    Ok(n)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_is_provider_unavailable() {
        let calls = AtomicU32::new(0);
        let err = retry(&fast_policy(2), "scholar", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(AttemptError::Transient("timed out".to_string())) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            ScoutError::ProviderUnavailable {
                provider,
                attempts,
                message,
            } => {
                assert_eq!(provider, "scholar");
                assert_eq!(attempts, 3);
                assert_eq!(message, "timed out");
            }
            other => panic!("Expected ProviderUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fatal_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let err = retry(&fast_policy(5), "web", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(AttemptError::Fatal(ScoutError::decode("web", "bad html"))) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, ScoutError::Decode { .. }));
    }

    #[test]
    fn test_no_retry_policy_makes_single_attempt() {
        let calls = AtomicU32::new(0);
        let err = tokio_test::block_on(retry(&RetryPolicy::no_retry(), "web", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(AttemptError::Transient("refused".to_string())) }
        }))
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, ScoutError::ProviderUnavailable { attempts: 1, .. }));
    }

    #[test]
    fn test_decode_body_failure_is_decode_error() {
        let value: serde_json::Value = decode_body("web", r#"{"ok": true}"#).unwrap();
        assert_eq!(value["ok"], true);

        match decode_body::<serde_json::Value>("scholar", "<html>").unwrap_err() {
            ScoutError::Decode { provider, .. } => assert_eq!(provider, "scholar"),
            other => panic!("Expected Decode, got {:?}", other),
        }
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        let short = excerpt(&long);
        assert!(short.ends_with("..."));
        assert_eq!(short.len(), ERROR_BODY_LIMIT + 3);
        assert_eq!(excerpt("  ok \n"), "ok");
    }
}
