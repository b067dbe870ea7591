//! Authenticators that attach credentials to outgoing Watson requests.
//!
//! A façade holds its [`Authenticator`] behind an `Arc` and calls it once per
//! request, after default and per-call headers have been merged. Token
//! acquisition and refresh (IAM) are outside this crate; a caller holding a
//! token obtained elsewhere uses [`BearerTokenAuthenticator`], keeps an
//! `Arc` to it (see `ServiceBuilder::with_shared_authenticator`) and swaps the
//! token with [`BearerTokenAuthenticator::set_bearer_token`] when it rotates.

use crate::errors::WatsonError;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::fmt;
use std::sync::RwLock;

/// Authentication type identifiers, as used by `<SERVICE>_AUTH_TYPE`.
pub const AUTH_TYPE_BASIC: &str = "basic";
pub const AUTH_TYPE_BEARER_TOKEN: &str = "bearerToken";
pub const AUTH_TYPE_NO_AUTH: &str = "noAuth";

/// Attaches credentials to a request.
#[async_trait]
pub trait Authenticator: Send + Sync + fmt::Debug {
    /// Short identifier of the scheme (`basic`, `bearerToken`, `noAuth`).
    fn authentication_type(&self) -> &'static str;

    /// Checks that the configuration is usable before any request is sent.
    fn validate(&self) -> Result<(), WatsonError>;

    /// Adds the credential to `headers`.
    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), WatsonError>;
}

/// Sends requests without credentials.
///
/// Used by the legacy Alchemy services, which carry their API key as a
/// query parameter instead.
#[derive(Debug, Clone, Default)]
pub struct NoAuthAuthenticator;

#[async_trait]
impl Authenticator for NoAuthAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_NO_AUTH
    }

    fn validate(&self) -> Result<(), WatsonError> {
        Ok(())
    }

    async fn authenticate(&self, _headers: &mut HeaderMap) -> Result<(), WatsonError> {
        Ok(())
    }
}

/// HTTP Basic authentication with a username and password.
#[derive(Clone)]
pub struct BasicAuthenticator {
    username: String,
    password: String,
}

impl BasicAuthenticator {
    /// Creates a basic authenticator, rejecting empty credentials.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, WatsonError> {
        let authenticator = Self {
            username: username.into(),
            password: password.into(),
        };
        authenticator.validate()?;
        Ok(authenticator)
    }

    fn header_value(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {encoded}")
    }
}

// Keeps the password out of debug output.
impl fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_BASIC
    }

    fn validate(&self) -> Result<(), WatsonError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(WatsonError::Auth(
                "username and password must both be provided".to_string(),
            ));
        }
        if has_surrounding_braces_or_quotes(&self.username)
            || has_surrounding_braces_or_quotes(&self.password)
        {
            return Err(WatsonError::Auth(
                "credentials must not start or end with curly brackets or quotes; \
                 remove them from your username and password"
                    .to_string(),
            ));
        }
        Ok(())
    }

    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), WatsonError> {
        let value = HeaderValue::from_str(&self.header_value())
            .map_err(|e| WatsonError::Auth(format!("invalid basic credentials: {e}")))?;
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Sends a caller-supplied bearer token.
///
/// The token can be replaced through a shared reference, so every façade
/// holding the same `Arc` picks up the new token on its next request.
pub struct BearerTokenAuthenticator {
    bearer_token: RwLock<String>,
}

impl BearerTokenAuthenticator {
    pub fn new(bearer_token: impl Into<String>) -> Result<Self, WatsonError> {
        let authenticator = Self {
            bearer_token: RwLock::new(bearer_token.into()),
        };
        authenticator.validate()?;
        Ok(authenticator)
    }

    /// Replaces the token used for subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns [`WatsonError::Auth`] for an empty token; the current token is
    /// kept.
    pub fn set_bearer_token(&self, bearer_token: impl Into<String>) -> Result<(), WatsonError> {
        let bearer_token = bearer_token.into();
        if bearer_token.is_empty() {
            return Err(empty_bearer_token());
        }
        *self
            .bearer_token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = bearer_token;
        Ok(())
    }

    fn current_token(&self) -> String {
        self.bearer_token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Clone for BearerTokenAuthenticator {
    fn clone(&self) -> Self {
        Self {
            bearer_token: RwLock::new(self.current_token()),
        }
    }
}

fn empty_bearer_token() -> WatsonError {
    WatsonError::Auth("bearer token must be provided".to_string())
}

impl fmt::Debug for BearerTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenAuthenticator")
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_BEARER_TOKEN
    }

    fn validate(&self) -> Result<(), WatsonError> {
        if self.current_token().is_empty() {
            return Err(empty_bearer_token());
        }
        Ok(())
    }

    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), WatsonError> {
        let value = HeaderValue::from_str(&format!("Bearer {}", self.current_token()))
            .map_err(|e| WatsonError::Auth(format!("invalid bearer token: {e}")))?;
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Credentials pasted from the IBM Cloud console often keep their quotes or
/// braces.
fn has_surrounding_braces_or_quotes(s: &str) -> bool {
    s.starts_with('{') || s.ends_with('}') || s.starts_with('"') || s.ends_with('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_authenticator_sets_header() {
        let auth = BasicAuthenticator::new("apikey", "secret").unwrap();
        let mut headers = HeaderMap::new();
        auth.authenticate(&mut headers).await.unwrap();

        // base64("apikey:secret")
        assert_eq!(
            headers.get(AUTHORIZATION).unwrap(),
            "Basic YXBpa2V5OnNlY3JldA=="
        );
        assert_eq!(auth.authentication_type(), "basic");
    }

    #[test]
    fn test_basic_authenticator_rejects_empty() {
        assert!(matches!(
            BasicAuthenticator::new("", "secret"),
            Err(WatsonError::Auth(_))
        ));
        assert!(matches!(
            BasicAuthenticator::new("user", ""),
            Err(WatsonError::Auth(_))
        ));
    }

    #[test]
    fn test_basic_authenticator_rejects_quoted_credentials() {
        assert!(BasicAuthenticator::new("\"user\"", "secret").is_err());
        assert!(BasicAuthenticator::new("user", "{secret}").is_err());
    }

    #[test]
    fn test_basic_authenticator_debug_redacts_password() {
        let auth = BasicAuthenticator::new("user", "hunter2").unwrap();
        let debug = format!("{auth:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_bearer_authenticator_sets_header() {
        let auth = BearerTokenAuthenticator::new("token-1").unwrap();
        let mut headers = HeaderMap::new();
        auth.authenticate(&mut headers).await.unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer token-1");

        auth.set_bearer_token("token-2").unwrap();
        auth.authenticate(&mut headers).await.unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer token-2");
    }

    #[test]
    fn test_bearer_authenticator_rejects_empty() {
        assert!(BearerTokenAuthenticator::new("").is_err());
    }

    #[tokio::test]
    async fn test_empty_rotation_keeps_current_token() {
        let auth = BearerTokenAuthenticator::new("token-1").unwrap();
        assert!(matches!(auth.set_bearer_token(""), Err(WatsonError::Auth(_))));

        let mut headers = HeaderMap::new();
        auth.authenticate(&mut headers).await.unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer token-1");
    }

    #[tokio::test]
    async fn test_bearer_rotation_through_shared_arc() {
        let auth = std::sync::Arc::new(BearerTokenAuthenticator::new("old").unwrap());
        let shared: std::sync::Arc<dyn Authenticator> = auth.clone();

        auth.set_bearer_token("new").unwrap();
        let mut headers = HeaderMap::new();
        shared.authenticate(&mut headers).await.unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer new");
    }

    #[tokio::test]
    async fn test_no_auth_leaves_headers_untouched() {
        let auth = NoAuthAuthenticator;
        let mut headers = HeaderMap::new();
        auth.authenticate(&mut headers).await.unwrap();
        assert!(headers.is_empty());
        assert_eq!(auth.authentication_type(), "noAuth");
    }
}
