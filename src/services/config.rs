use crate::constants::{env, network, protocols::ALLOWED_HTTP};
use crate::errors::ToolError;
use crate::services::admin_token::{AdminKey, TokenError};
use crate::services::ghost_client::RetryPolicy;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
    #[error("{name} must be a {expected}, got '{value}'")]
    InvalidNumber {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("admin key: {0}")]
    AdminKey(#[from] TokenError),
}

impl From<ConfigError> for ToolError {
    fn from(err: ConfigError) -> Self {
        ToolError::config(err.to_string())
    }
}

/// Everything a tool call needs to reach one Ghost site.
#[derive(Debug, Clone)]
pub struct GhostConfig {
    pub api_url: Url,
    pub admin_key: AdminKey,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl GhostConfig {
    pub fn new(api_url: &str, admin_key: AdminKey) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            admin_key,
            timeout: Duration::from_millis(network::TIMEOUT_API_REQUEST_MS),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = read(env::API_URL).ok_or(ConfigError::Missing(env::API_URL))?;
        let admin_key = match read(env::ADMIN_API_KEY) {
            Some(raw) => AdminKey::parse(&raw)?,
            None => {
                let id = read(env::ADMIN_KEY_ID).ok_or(ConfigError::Missing(env::ADMIN_API_KEY))?;
                let secret =
                    read(env::ADMIN_KEY_SECRET).ok_or(ConfigError::Missing(env::ADMIN_KEY_SECRET))?;
                AdminKey::new(&id, &secret)?
            }
        };

        let mut config = Self::new(&api_url, admin_key)?;
        if let Some(raw) = read(env::TIMEOUT_MS) {
            let ms = parse_u64(env::TIMEOUT_MS, &raw)?;
            config.timeout = Duration::from_millis(ms.max(1));
        }
        if let Some(raw) = read(env::MAX_RETRIES) {
            config.retry.max_retries = parse_u64(env::MAX_RETRIES, &raw)? as usize;
        }
        if let Some(raw) = read(env::BACKOFF_FACTOR) {
            config.retry.backoff_factor = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    name: env::BACKOFF_FACTOR,
                    expected: "non-negative number",
                    value: raw.clone(),
                })?;
        }
        Ok(config)
    }

    /// `{base}/ghost/api/admin/{path}`; `path` may carry its own query string.
    pub fn admin_url(&self, path: &str) -> String {
        let base = self.api_url.as_str().trim_end_matches('/');
        format!(
            "{}/{}/{}",
            base,
            network::ADMIN_API_PATH,
            path.trim_start_matches('/')
        )
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|err| ConfigError::InvalidUrl {
        name: env::API_URL,
        reason: err.to_string(),
    })?;
    let scheme = format!("{}:", parsed.scheme());
    if !ALLOWED_HTTP.contains(&scheme.as_str()) {
        return Err(ConfigError::InvalidUrl {
            name: env::API_URL,
            reason: "only http and https are supported".to_string(),
        });
    }
    Ok(parsed)
}

fn parse_u64(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            expected: "non-negative integer",
            value: raw.to_string(),
        })
}
