//! Auth configuration types

use chrono::{DateTime, Utc};

/// Token type used when the token endpoint omits one
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// How requests to Vanta are authenticated
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Static bearer token
    Bearer {
        /// The bearer token
        token: String,
    },

    /// OAuth2 Client Credentials flow
    Oauth2ClientCredentials {
        /// Token endpoint URL
        token_url: String,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Requested scopes
        scopes: Vec<String>,
    },
}

impl AuthConfig {
    /// Short label for logs and diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            AuthConfig::Bearer { .. } => "access_token",
            AuthConfig::Oauth2ClientCredentials { .. } => "oauth2_client_credentials",
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// Authorization scheme, e.g. `Bearer`
    pub token_type: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, token_type: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token,
            token_type,
            expires_at,
        }
    }

    /// Create a bearer token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self::new(token, DEFAULT_TOKEN_TYPE.to_string(), Some(expires_at))
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}
