//! Personality Insights v3.
//!
//! Infers Big Five personality traits, needs, values and consumption
//! preferences from written text.

use super::{checked_version, impl_watson_service};
use crate::auth::Authenticator;
use crate::errors::WatsonError;
use crate::models::personality_insights::Content;
use crate::request::{HeaderOverrides, WatsonRequest, require, require_non_empty};
use crate::service::{BaseService, DetailedResponse, ServiceBuilder, ServiceInfo};
use reqwest::Method;
use serde_json::Value;

pub const SERVICE: ServiceInfo = ServiceInfo {
    name: "personality_insights",
    version: "V3",
    default_url: "https://api.us-south.personality-insights.watson.cloud.ibm.com",
};

/// Input text for a profile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileContent {
    /// Content items sent as JSON.
    Json(Content),
    Plain(String),
    Html(String),
}

/// Optional arguments of [`PersonalityInsightsV3::profile`].
#[derive(Debug, Clone, Default)]
pub struct ProfileOptions {
    pub content_language: Option<String>,
    pub accept_language: Option<String>,
    /// Include raw scores alongside normalized percentiles.
    pub raw_scores: Option<bool>,
    /// Include a header row (CSV output only).
    pub csv_headers: Option<bool>,
    pub consumption_preferences: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct PersonalityInsightsV3 {
    base: BaseService,
    version: String,
}

impl_watson_service!(PersonalityInsightsV3);

impl PersonalityInsightsV3 {
    /// Creates a client for API version `version` (e.g. `2017-10-13`).
    pub fn new(
        version: impl Into<String>,
        authenticator: impl Authenticator + 'static,
    ) -> Result<Self, WatsonError> {
        Self::with_builder(version, ServiceBuilder::new(authenticator))
    }

    pub fn with_builder(
        version: impl Into<String>,
        builder: ServiceBuilder,
    ) -> Result<Self, WatsonError> {
        Ok(Self {
            version: checked_version(version.into())?,
            base: builder.build(&SERVICE)?,
        })
    }

    pub fn from_env(version: impl Into<String>) -> Result<Self, WatsonError> {
        Self::with_builder(version, ServiceBuilder::from_env(&SERVICE)?)
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    fn profile_request(
        &self,
        content: ProfileContent,
        accept: &str,
        options: &ProfileOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<WatsonRequest, WatsonError> {
        match &content {
            ProfileContent::Json(content) => {
                require_non_empty("content", &content.content_items)?;
            }
            ProfileContent::Plain(text) | ProfileContent::Html(text) => {
                require("content", text)?;
            }
        }

        let request = WatsonRequest::new(Method::POST, "/v3/profile")
            .query("version", &self.version)
            .query_opt("raw_scores", options.raw_scores)
            .query_opt("csv_headers", options.csv_headers)
            .query_opt("consumption_preferences", options.consumption_preferences)
            .header_value("Accept", accept)
            .header_opt("Content-Language", options.content_language.as_deref())
            .header_opt("Accept-Language", options.accept_language.as_deref());

        let request = match content {
            ProfileContent::Json(content) => request
                .header_value("Content-Type", "application/json")
                .json(serde_json::to_value(&content)?),
            ProfileContent::Plain(text) => request.raw("text/plain", text),
            ProfileContent::Html(text) => request.raw("text/html", text),
        };

        Ok(request.with_overrides(headers))
    }

    /// Generates a personality profile as JSON.
    pub async fn profile(
        &self,
        content: ProfileContent,
        options: &ProfileOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = self.profile_request(content, "application/json", options, headers)?;
        self.base.send_json("profile", request).await
    }

    /// Generates a personality profile as CSV.
    pub async fn profile_as_csv(
        &self,
        content: ProfileContent,
        options: &ProfileOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<String>, WatsonError> {
        let request = self.profile_request(content, "text/csv", options, headers)?;
        self.base.send_text("profile", request).await
    }
}
