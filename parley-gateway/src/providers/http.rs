//! Remote provider reached over HTTP.
//!
//! POSTs `{"prompt", "context"}` as JSON and decodes the body with
//! [`decode_suggestions`](crate::decoding::decode_suggestions).

use std::time::Duration;

use async_trait::async_trait;
use parley_core::errors::ProviderError;
use parley_core::models::{ContextSnapshot, Suggestion, SuggestionSource};
use parley_core::traits::ISuggestionProvider;
use serde::Serialize;
use tracing::debug;

use crate::decoding::decode_suggestions;

/// Connection settings for an [`HttpProvider`].
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    pub id: String,
    pub source: SuggestionSource,
    pub endpoint: String,
    pub api_key: Option<String>,
}

#[derive(Serialize)]
struct RequestBody<'a> {
    prompt: &'a str,
    context: &'a ContextSnapshot,
}

pub struct HttpProvider {
    config: HttpProviderConfig,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(config: HttpProviderConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Reuse an existing client (shared connection pool).
    pub fn with_client(config: HttpProviderConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn map_transport_error(&self, err: reqwest::Error, timeout: Duration) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout {
                provider: self.config.id.clone(),
                timeout_ms: timeout.as_millis() as u64,
            }
        } else {
            ProviderError::NetworkError {
                provider: self.config.id.clone(),
                reason: err.to_string(),
            }
        }
    }

    fn map_status(
        &self,
        status: reqwest::StatusCode,
        retry_after: Option<u64>,
        body: &str,
    ) -> ProviderError {
        let provider = self.config.id.clone();
        match status.as_u16() {
            401 | 403 => ProviderError::AuthFailure {
                provider,
                reason: format!("HTTP {status}: {}", snippet(body)),
            },
            429 => ProviderError::RateLimited {
                provider,
                retry_after_ms: retry_after,
            },
            _ => ProviderError::NetworkError {
                provider,
                reason: format!("HTTP {status}: {}", snippet(body)),
            },
        }
    }
}

#[async_trait]
impl ISuggestionProvider for HttpProvider {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn source(&self) -> SuggestionSource {
        self.config.source
    }

    async fn call(
        &self,
        prompt: &str,
        context: &ContextSnapshot,
        timeout: Duration,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .timeout(timeout)
            .json(&RequestBody { prompt, context });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e, timeout))?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e, timeout))?;

        if !status.is_success() {
            return Err(self.map_status(status, retry_after, &body));
        }

        let suggestions = decode_suggestions(&body, self.config.source).map_err(|source| {
            ProviderError::MalformedResponse {
                provider: self.config.id.clone(),
                source,
            }
        })?;
        debug!(provider = %self.config.id, count = suggestions.len(), "decoded response");
        Ok(suggestions)
    }
}

/// `Retry-After` in delta-seconds form, converted to milliseconds.
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

fn snippet(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(i, _)| i);
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    fn provider() -> HttpProvider {
        HttpProvider::new(HttpProviderConfig {
            id: "neural".into(),
            source: SuggestionSource::Neural,
            endpoint: "http://127.0.0.1:9/suggest".into(),
            api_key: None,
        })
    }

    #[test]
    fn status_codes_are_classified() {
        let p = provider();
        let auth = p.map_status(reqwest::StatusCode::UNAUTHORIZED, None, "nope");
        assert!(matches!(auth, ProviderError::AuthFailure { .. }));
        let forbidden = p.map_status(reqwest::StatusCode::FORBIDDEN, None, "");
        assert!(matches!(forbidden, ProviderError::AuthFailure { .. }));
        let limited = p.map_status(reqwest::StatusCode::TOO_MANY_REQUESTS, Some(3000), "");
        assert!(matches!(
            limited,
            ProviderError::RateLimited {
                retry_after_ms: Some(3000),
                ..
            }
        ));
        let server = p.map_status(reqwest::StatusCode::BAD_GATEWAY, None, "down");
        assert!(matches!(server, ProviderError::NetworkError { .. }));
        assert_eq!(server.provider(), "neural");
    }

    #[test]
    fn retry_after_seconds_become_millis() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
        assert_eq!(parse_retry_after(&headers), Some(2000));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let long = "é".repeat(500);
        assert_eq!(snippet(&long).chars().count(), 200);
        assert_eq!(snippet("short"), "short");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let err = provider()
            .call("hi", &ContextSnapshot::empty("c"), Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::NetworkError { .. } | ProviderError::Timeout { .. }
        ));
    }
}
