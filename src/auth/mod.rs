//! Authentication module
//!
//! Supports static access tokens and the OAuth2 client-credentials flow.
//!
//! The `Authenticator` caches OAuth tokens and refreshes them shortly
//! before they expire, or on demand after the API rejects one.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken, DEFAULT_TOKEN_TYPE};

#[cfg(test)]
mod tests;
