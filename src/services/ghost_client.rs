use crate::constants::network::USER_AGENT;
use crate::constants::retry as retry_constants;
use crate::errors::ToolError;
use crate::services::admin_token::create_admin_token;
use crate::services::config::GhostConfig;
use crate::services::logger::Logger;
use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub backoff_factor: f64,
    pub backoff_max_ms: u64,
    pub status_codes: Vec<u16>,
    pub retry_after_status_codes: Vec<u16>,
    pub methods: Vec<String>,
    pub respect_retry_after: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: retry_constants::MAX_RETRIES,
            backoff_factor: retry_constants::BACKOFF_FACTOR,
            backoff_max_ms: retry_constants::BACKOFF_MAX_MS,
            status_codes: retry_constants::STATUS_CODES.to_vec(),
            retry_after_status_codes: retry_constants::RETRY_AFTER_STATUS_CODES.to_vec(),
            methods: retry_constants::IDEMPOTENT_METHODS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            respect_retry_after: true,
        }
    }
}

impl RetryPolicy {
    pub fn allows_method(&self, method: &Method) -> bool {
        self.methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method.as_str()))
    }

    pub fn should_retry_status(&self, method: &Method, status: u16) -> bool {
        self.status_codes.contains(&status) && self.allows_method(method)
    }

    /// Connection failures never reached the server, so any method may retry.
    pub fn should_retry_transport(&self, method: &Method, err: &reqwest::Error) -> bool {
        err.is_connect() || self.allows_method(method)
    }

    /// Delay before retry number `retry` (1-based): none for the first retry,
    /// then `backoff_factor * 2^(retry - 1)` seconds.
    pub fn backoff_delay(&self, retry: usize) -> Duration {
        if retry <= 1 || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exponent = (retry - 1).min(32) as i32;
        let ms = self.backoff_factor * 1000.0 * 2f64.powi(exponent);
        Duration::from_millis((ms as u64).min(self.backoff_max_ms))
    }

    pub fn retry_after_delay(&self, status: u16, header: Option<&str>) -> Option<Duration> {
        if !self.respect_retry_after || !self.retry_after_status_codes.contains(&status) {
            return None;
        }
        let seconds = header?.trim().parse::<u64>().ok()?;
        Some(Duration::from_millis(
            seconds.saturating_mul(1000).min(self.backoff_max_ms),
        ))
    }
}

/// A 2xx answer; `body` is `None` when the server sent nothing (e.g. 204).
#[derive(Debug, Clone, PartialEq)]
pub struct GhostResponse {
    pub status: u16,
    pub body: Option<Value>,
}

/// Signs and sends Admin API requests for a single tool invocation.
///
/// Each client owns its own connection pool, which is released on drop.
pub struct GhostClient {
    config: GhostConfig,
    client: Client,
    logger: Logger,
}

impl GhostClient {
    pub fn new(config: &GhostConfig, logger: &Logger) -> Result<Self, ToolError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            config: config.clone(),
            client,
            logger: logger.child("client"),
        })
    }

    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<GhostResponse, ToolError> {
        self.send(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<GhostResponse, ToolError> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<GhostResponse, ToolError> {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<GhostResponse, ToolError> {
        self.send(Method::DELETE, path, &[], None).await
    }

    pub fn build_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ToolError> {
        let raw = self.config.admin_url(path);
        let mut url = Url::parse(&raw)
            .map_err(|err| ToolError::internal(format!("Invalid request URL {}: {}", raw, err)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<GhostResponse, ToolError> {
        let url = self.build_url(path, query)?;
        let policy = &self.config.retry;
        let mut retries = 0usize;

        loop {
            self.logger.debug(
                "HTTP request",
                Some(&serde_json::json!({
                    "method": method.as_str(),
                    "url": url.as_str(),
                    "attempt": retries + 1,
                })),
            );

            // Signed per attempt so a long backoff never sends an expired token.
            let token = create_admin_token(&self.config.admin_key);
            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .header(AUTHORIZATION, format!("Ghost {}", token))
                .header(ACCEPT, "application/json");
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    if retries < policy.max_retries && policy.should_retry_transport(&method, &err)
                    {
                        retries += 1;
                        let delay = policy.backoff_delay(retries);
                        self.log_retry(&method, &url, retries, delay, &err.to_string());
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(self.transport_error(&url, &err, retries));
                }
            };

            let status = response.status();
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());
            let text = response
                .text()
                .await
                .map_err(|err| self.transport_error(&url, &err, retries))?;

            if status.is_success() {
                return parse_success(status, &url, &text);
            }

            let code = status.as_u16();
            if policy.should_retry_status(&method, code) {
                if retries < policy.max_retries {
                    retries += 1;
                    let delay = policy
                        .retry_after_delay(code, retry_after.as_deref())
                        .unwrap_or_else(|| policy.backoff_delay(retries));
                    self.log_retry(&method, &url, retries, delay, &code.to_string());
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Err(ToolError::http(format!(
                    "Max retries exceeded for url: {} (too many {} error responses)",
                    url, code
                ))
                .with_status(code)
                .with_response_body(text));
            }

            return Err(status_error(status, &url).with_response_body(text));
        }
    }

    fn log_retry(&self, method: &Method, url: &Url, retry: usize, delay: Duration, cause: &str) {
        self.logger.warn(
            "HTTP retry",
            Some(&serde_json::json!({
                "method": method.as_str(),
                "url": url.as_str(),
                "retry": retry,
                "delay_ms": delay.as_millis() as u64,
                "cause": cause,
            })),
        );
    }

    fn transport_error(&self, url: &Url, err: &reqwest::Error, retries: usize) -> ToolError {
        let cause = if err.is_timeout() {
            format!(
                "Request timed out after {}ms for url: {}",
                self.config.timeout.as_millis(),
                url
            )
        } else {
            err.to_string()
        };
        if retries > 0 {
            ToolError::http(format!(
                "Max retries exceeded for url: {} (caused by: {})",
                url, cause
            ))
        } else {
            ToolError::http(cause)
        }
    }
}

fn status_error(status: StatusCode, url: &Url) -> ToolError {
    let class = if status.is_server_error() {
        "Server"
    } else {
        "Client"
    };
    ToolError::http(format!(
        "{} {} Error: {} for url: {}",
        status.as_u16(),
        class,
        status.canonical_reason().unwrap_or("Unknown"),
        url
    ))
    .with_status(status.as_u16())
}

fn parse_success(status: StatusCode, url: &Url, text: &str) -> Result<GhostResponse, ToolError> {
    if text.trim().is_empty() {
        return Ok(GhostResponse {
            status: status.as_u16(),
            body: None,
        });
    }
    let body = serde_json::from_str::<Value>(text).map_err(|err| {
        ToolError::internal(format!("Invalid JSON in response from {}: {}", url, err))
    })?;
    Ok(GhostResponse {
        status: status.as_u16(),
        body: Some(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_skips_first_retry_then_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::ZERO);
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(4));
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy {
            backoff_max_ms: 3_000,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff_delay(10), Duration::from_millis(3_000));
        let none = RetryPolicy {
            backoff_factor: 0.0,
            ..RetryPolicy::default()
        };
        assert_eq!(none.backoff_delay(3), Duration::ZERO);
    }

    #[test]
    fn status_retry_requires_listed_status_and_idempotent_method() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry_status(&Method::GET, 503));
        assert!(policy.should_retry_status(&Method::PUT, 429));
        assert!(policy.should_retry_status(&Method::DELETE, 500));
        assert!(!policy.should_retry_status(&Method::GET, 404));
        assert!(!policy.should_retry_status(&Method::GET, 422));
        assert!(!policy.should_retry_status(&Method::POST, 503));
    }

    #[test]
    fn retry_after_applies_only_to_listed_statuses() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.retry_after_delay(429, Some("3")),
            Some(Duration::from_secs(3))
        );
        assert_eq!(policy.retry_after_delay(500, Some("3")), None);
        assert_eq!(policy.retry_after_delay(503, Some("soon")), None);
        assert_eq!(
            policy.retry_after_delay(503, Some("100000")),
            Some(Duration::from_millis(policy.backoff_max_ms))
        );
    }

    #[test]
    fn status_errors_name_class_reason_and_url() {
        let url = Url::parse("https://blog.test/ghost/api/admin/posts/1").expect("url");
        let err = status_error(StatusCode::NOT_FOUND, &url);
        assert_eq!(
            err.message,
            "404 Client Error: Not Found for url: https://blog.test/ghost/api/admin/posts/1"
        );
        assert_eq!(err.status, Some(404));
        let err = status_error(StatusCode::BAD_GATEWAY, &url);
        assert!(err.message.starts_with("502 Server Error: Bad Gateway"));
    }

    #[test]
    fn empty_success_body_has_no_json() {
        let url = Url::parse("https://blog.test/").expect("url");
        let response = parse_success(StatusCode::NO_CONTENT, &url, "").expect("ok");
        assert_eq!(response.body, None);
        assert!(parse_success(StatusCode::OK, &url, "<html>").is_err());
    }
}
