//! Client configuration

use crate::{Error, Result, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECONDS, USER_AGENT};
use config::Environment;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Ohmyfin client configuration
///
/// Built once and handed to [`crate::Client::new`], which owns it from then on.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

/// Shape read from the environment by [`ClientConfig::from_env`]
#[derive(Debug, Deserialize)]
struct EnvConfig {
    api_key: Option<String>,
    base_url: String,
    timeout_secs: u64,
    user_agent: Option<String>,
}

impl ClientConfig {
    /// Create configuration with default base URL and timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Override the API base URL (trailing slashes are dropped)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Load configuration from `OHMYFIN_*` environment variables
    ///
    /// Reads `OHMYFIN_API_KEY`, `OHMYFIN_BASE_URL`, `OHMYFIN_TIMEOUT_SECS` and
    /// `OHMYFIN_USER_AGENT`. Only the API key is mandatory.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(Environment::with_prefix("OHMYFIN"))
    }

    fn from_environment(environment: Environment) -> Result<Self> {
        let env: EnvConfig = config::Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECONDS as i64)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        let mut config = Self::new(env.api_key.unwrap_or_default())
            .with_base_url(env.base_url)
            .with_timeout(Duration::from_secs(env.timeout_secs));
        if let Some(user_agent) = env.user_agent {
            config = config.with_user_agent(user_agent);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config(
                "API key is required. Get your API key at https://ohmyfin.ai".to_string(),
            ));
        }

        if self.base_url.is_empty() {
            return Err(Error::Config("Base URL cannot be empty".to_string()));
        }

        if self.timeout.is_zero() {
            return Err(Error::Config("Timeout must be greater than zero".to_string()));
        }

        Ok(())
    }

    /// API key sent in the `KEY` header
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// API base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// User-Agent header value
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
