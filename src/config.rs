//! Connection configuration
//!
//! A connection is described by a small YAML (or JSON) document:
//!
//! ```yaml
//! client_id: "vci_..."
//! client_secret: "vcs_..."
//! # or, instead of the client pair:
//! # access_token: "..."
//! base_url: "https://api.vanta.com"
//! scopes: ["vanta-api.all:read"]
//! http:
//!   timeout_seconds: 30
//!   max_retries: 3
//!   rate_limit:
//!     requests_per_second: 10
//!     burst_size: 10
//! ```
//!
//! Missing credentials fall back to `VANTA_CLIENT_ID`, `VANTA_CLIENT_SECRET`,
//! `VANTA_API_TOKEN` and `VANTA_BASE_URL`.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.vanta.com";

/// Default OAuth scope (read-only access to every resource)
pub const DEFAULT_SCOPE: &str = "vanta-api.all:read";

/// Environment variable names consulted when the file leaves a field unset
pub mod env {
    pub const CLIENT_ID: &str = "VANTA_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "VANTA_CLIENT_SECRET";
    pub const API_TOKEN: &str = "VANTA_API_TOKEN";
    pub const BASE_URL: &str = "VANTA_BASE_URL";
}

// ============================================================================
// Connection Config
// ============================================================================

/// Configuration for one Vanta connection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// OAuth application client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth application client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Pre-issued access token, used when no client pair is configured
    #[serde(default, alias = "api_token")]
    pub access_token: Option<String>,

    /// API base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// OAuth scopes to request
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_scopes() -> Vec<String> {
    vec![DEFAULT_SCOPE.to_string()]
}

/// Resolved credentials for a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// OAuth client-credentials pair
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
    /// Static access token
    AccessToken(String),
}

impl ConnectionConfig {
    /// Parse a config from a YAML (or JSON) string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(yaml)?;
        if config.scopes.is_empty() {
            config.scopes = default_scopes();
        }
        Ok(config)
    }

    /// Load a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load from an optional file, then fill gaps from the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default_with_scopes(),
        };
        Ok(config.with_env())
    }

    fn default_with_scopes() -> Self {
        Self {
            scopes: default_scopes(),
            ..Self::default()
        }
    }

    /// Fill unset fields from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Fill unset fields using the given lookup
    #[must_use]
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fill = |field: Option<String>, key: &str| {
            field.none_if_empty().or_else(|| lookup(key).none_if_empty())
        };
        self.client_id = fill(self.client_id, env::CLIENT_ID);
        self.client_secret = fill(self.client_secret, env::CLIENT_SECRET);
        self.access_token = fill(self.access_token, env::API_TOKEN);
        self.base_url = fill(self.base_url, env::BASE_URL);
        self
    }

    /// Base URL with the default applied
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    /// OAuth token endpoint
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.base_url().trim_end_matches('/'))
    }

    /// Resolve credentials: the client pair wins over a static token
    pub fn credentials(&self) -> Result<Credentials> {
        let id = self.client_id.clone().none_if_empty();
        let secret = self.client_secret.clone().none_if_empty();

        match (id, secret) {
            (Some(client_id), Some(client_secret)) => Ok(Credentials::ClientCredentials {
                client_id,
                client_secret,
            }),
            (Some(_), None) => Err(Error::missing_field("client_secret")),
            (None, Some(_)) => Err(Error::missing_field("client_id")),
            (None, None) => match self.access_token.clone().none_if_empty() {
                Some(token) => Ok(Credentials::AccessToken(token)),
                None => Err(Error::config(
                    "authentication required: provide either client_id/client_secret or access_token",
                )),
            },
        }
    }

    /// Build the runtime auth config
    pub fn auth_config(&self) -> Result<AuthConfig> {
        Ok(match self.credentials()? {
            Credentials::ClientCredentials {
                client_id,
                client_secret,
            } => AuthConfig::Oauth2ClientCredentials {
                token_url: self.token_url(),
                client_id,
                client_secret,
                scopes: self.scopes.clone(),
            },
            Credentials::AccessToken(token) => AuthConfig::Bearer { token },
        })
    }

    /// Build the HTTP client config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url())
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.retry_backoff.backoff_type,
                Duration::from_millis(self.http.retry_backoff.initial_ms),
                Duration::from_millis(self.http.retry_backoff.max_ms),
            );

        builder = match &self.http.rate_limit {
            Some(rl) => builder.rate_limit(RateLimiterConfig::new(
                rl.requests_per_second,
                rl.burst_size,
            )),
            None => builder.no_rate_limit(),
        };

        builder.build()
    }

    /// Validate that the config can produce a working client
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(self.base_url()).map_err(|e| Error::InvalidConfigValue {
            field: "base_url".to_string(),
            message: e.to_string(),
        })?;
        if self.http.timeout_seconds == 0 {
            return Err(Error::InvalidConfigValue {
                field: "http.timeout_seconds".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        self.credentials().map(|_| ())
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub retry_backoff: BackoffConfig,

    /// Client-side rate limit; `null` disables it
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_backoff: BackoffConfig::default(),
            rate_limit: default_rate_limit(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_rate_limit() -> Option<RateLimitConfig> {
    Some(RateLimitConfig::default())
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    250
}

fn default_max_ms() -> u64 {
    30_000
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per second limit
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,

    /// Token bucket size
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_rps(),
            burst_size: default_burst(),
        }
    }
}

fn default_rps() -> u32 {
    10
}

fn default_burst() -> u32 {
    10
}
