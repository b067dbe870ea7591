//! Tone Analyzer v3.
//!
//! Detects emotional and language tones in written text, either as a whole
//! document with per-sentence breakdown or as a chat conversation.

use super::{checked_version, impl_watson_service};
use crate::auth::Authenticator;
use crate::errors::WatsonError;
use crate::models::tone_analyzer::Utterance;
use crate::request::{HeaderOverrides, WatsonRequest, require, require_non_empty};
use crate::service::{BaseService, DetailedResponse, ServiceBuilder, ServiceInfo};
use reqwest::Method;
use serde_json::{Value, json};

pub const SERVICE: ServiceInfo = ServiceInfo {
    name: "tone_analyzer",
    version: "V3",
    default_url: "https://api.us-south.tone-analyzer.watson.cloud.ibm.com",
};

/// Text to analyze, with the encoding it is sent in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToneInput {
    /// Sent as `{"text": ..}` with `Content-Type: application/json`.
    Json(String),
    /// Sent verbatim as `text/plain`.
    Plain(String),
    /// Sent verbatim as `text/html`; markup is stripped by the service.
    Html(String),
}

impl ToneInput {
    fn text(&self) -> &str {
        match self {
            Self::Json(text) | Self::Plain(text) | Self::Html(text) => text,
        }
    }
}

/// Optional arguments of [`ToneAnalyzerV3::tone`].
#[derive(Debug, Clone, Default)]
pub struct ToneOptions {
    /// `false` skips sentence-level analysis.
    pub sentences: Option<bool>,
    /// Restricts the analysis to these tone categories (`emotion`,
    /// `language`, `social`). Only affects the 2016-05-19 API version.
    pub tones: Option<Vec<String>>,
    pub content_language: Option<String>,
    pub accept_language: Option<String>,
}

/// Optional arguments of [`ToneAnalyzerV3::tone_chat`].
#[derive(Debug, Clone, Default)]
pub struct ToneChatOptions {
    pub content_language: Option<String>,
    pub accept_language: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ToneAnalyzerV3 {
    base: BaseService,
    version: String,
}

impl_watson_service!(ToneAnalyzerV3);

impl ToneAnalyzerV3 {
    /// Creates a client for API version `version` (e.g. `2017-09-21`).
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

    /// Analyzes the tone of a document.
    pub async fn tone(
        &self,
        input: ToneInput,
        options: &ToneOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("tone_input", input.text())?;

        let request = WatsonRequest::new(Method::POST, "/v3/tone")
            .query("version", &self.version)
            .query_opt("sentences", options.sentences)
            .query_list("tones", options.tones.as_deref())
            .header_value("Accept", "application/json")
            .header_opt("Content-Language", options.content_language.as_deref())
            .header_opt("Accept-Language", options.accept_language.as_deref());

        let request = match input {
            ToneInput::Json(text) => request
                .header_value("Content-Type", "application/json")
                .json(json!({ "text": text })),
            ToneInput::Plain(text) => request.raw("text/plain", text),
            ToneInput::Html(text) => request.raw("text/html", text),
        };

        self.base
            .send_json("tone", request.with_overrides(headers))
            .await
    }

    /// Analyzes customer-engagement tones per chat utterance.
    pub async fn tone_chat(
        &self,
        utterances: &[Utterance],
        options: &ToneChatOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require_non_empty("utterances", utterances)?;

        let request = WatsonRequest::new(Method::POST, "/v3/tone_chat")
            .query("version", &self.version)
            .header_value("Accept", "application/json")
            .header_opt("Content-Language", options.content_language.as_deref())
            .header_opt("Accept-Language", options.accept_language.as_deref())
            .json(json!({ "utterances": utterances }))
            .with_overrides(headers);
        self.base.send_json("tone_chat", request).await
    }
}
