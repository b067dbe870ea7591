//! Client configuration that lives outside a single call.
//!
//! - [`SdkInfo`]: the `User-Agent` string, computed when a client is built.
//! - [`ServiceCredentials`]: credentials and URL overrides read from
//!   `<SERVICE_NAME>_*` environment variables.

use crate::auth::{
    AUTH_TYPE_BASIC, AUTH_TYPE_BEARER_TOKEN, AUTH_TYPE_NO_AUTH, Authenticator, BasicAuthenticator,
    BearerTokenAuthenticator, NoAuthAuthenticator,
};
use crate::errors::WatsonError;
use std::env;

const SDK_NAME: &str = "ibm-watson-rust-sdk";

/// Identifies this SDK to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkInfo {
    user_agent: String,
}

impl SdkInfo {
    /// Builds the user agent from the crate version and the host platform,
    /// e.g. `ibm-watson-rust-sdk-0.4.0 (linux x86_64)`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_agent: format!(
                "{SDK_NAME}-{} ({} {})",
                env!("CARGO_PKG_VERSION"),
                env::consts::OS,
                env::consts::ARCH
            ),
        }
    }

    /// Uses a caller-provided user agent verbatim.
    #[must_use]
    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Default for SdkInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Credentials for one service, as found in the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub auth_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bearer_token: Option<String>,
    pub url: Option<String>,
}

impl ServiceCredentials {
    /// Reads `<SERVICE_NAME>_AUTH_TYPE`, `_USERNAME`, `_PASSWORD`,
    /// `_BEARER_TOKEN` and `_URL` from the process environment.
    ///
    /// `service_name` is the snake_case service name, e.g.
    /// `language_translator`.
    #[must_use]
    pub fn from_env(service_name: &str) -> Self {
        Self::from_lookup(service_name, |key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), with an injectable lookup.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = service_name.to_uppercase().replace('-', "_");
        let get = |suffix: &str| lookup(&format!("{prefix}_{suffix}")).filter(|v| !v.is_empty());

        Self {
            auth_type: get("AUTH_TYPE"),
            username: get("USERNAME"),
            password: get("PASSWORD"),
            bearer_token: get("BEARER_TOKEN"),
            url: get("URL"),
        }
    }

    /// Returns `true` if nothing was configured for this service.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Builds the authenticator these credentials describe.
    ///
    /// Without an explicit auth type, a bearer token wins over a
    /// username/password pair; with neither, `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`WatsonError::Auth`] for an unknown auth type or when the
    /// chosen type lacks its credentials.
    pub fn authenticator(&self) -> Result<Option<Box<dyn Authenticator>>, WatsonError> {
        let auth_type = match self.auth_type.as_deref() {
            Some(t) => t.to_string(),
            None if self.bearer_token.is_some() => AUTH_TYPE_BEARER_TOKEN.to_string(),
            None if self.username.is_some() || self.password.is_some() => {
                AUTH_TYPE_BASIC.to_string()
            }
            None => return Ok(None),
        };

        let authenticator: Box<dyn Authenticator> = if auth_type.eq_ignore_ascii_case(AUTH_TYPE_BASIC)
        {
            Box::new(BasicAuthenticator::new(
                self.username.clone().unwrap_or_default(),
                self.password.clone().unwrap_or_default(),
            )?)
        } else if auth_type.eq_ignore_ascii_case(AUTH_TYPE_BEARER_TOKEN) {
            Box::new(BearerTokenAuthenticator::new(
                self.bearer_token.clone().unwrap_or_default(),
            )?)
        } else if auth_type.eq_ignore_ascii_case(AUTH_TYPE_NO_AUTH) {
            Box::new(NoAuthAuthenticator)
        } else {
            return Err(WatsonError::Auth(format!(
                "unsupported authentication type '{auth_type}'"
            )));
        };

        Ok(Some(authenticator))
    }
}
