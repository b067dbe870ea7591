//! AlchemyLanguage v1 (deprecated).
//!
//! Text analysis over plain text, HTML or a URL. Unlike the current Watson
//! services, Alchemy authenticates with an `apikey` query parameter and
//! reports failures inside a 200 response as `{"status": "ERROR"}`.

use super::impl_watson_service;
use crate::auth::NoAuthAuthenticator;
use crate::errors::WatsonError;
use crate::http::common::TRANSACTION_ID_HEADER;
use crate::request::{HeaderOverrides, WatsonRequest, require};
use crate::service::{BaseService, DetailedResponse, ServiceBuilder, ServiceInfo};
use reqwest::Method;
use serde_json::Value;

pub const SERVICE: ServiceInfo = ServiceInfo {
    name: "alchemy_language",
    version: "V1",
    default_url: "https://gateway-a.watsonplatform.net/calls",
};

/// What an Alchemy call analyzes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlchemySource {
    Text(String),
    Html(String),
    /// A public web page fetched by the service.
    Url(String),
}

impl AlchemySource {
    /// Path prefix and form field for this source.
    fn route(&self) -> (&'static str, &'static str, &str) {
        match self {
            Self::Text(text) => ("/text/Text", "text", text),
            Self::Html(html) => ("/html/HTML", "html", html),
            Self::Url(url) => ("/url/URL", "url", url),
        }
    }
}

/// Optional arguments shared by the ranked extraction calls.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOptions {
    /// Maximum number of results (`maxRetrieve`).
    pub max_items: Option<u32>,
    /// Include per-item sentiment.
    pub sentiment: Option<bool>,
    /// Include per-item emotion.
    pub emotion: Option<bool>,
    /// Forces the input language instead of detecting it.
    pub language: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AlchemyLanguageV1 {
    base: BaseService,
    api_key: String,
}

impl_watson_service!(AlchemyLanguageV1);

impl AlchemyLanguageV1 {
    pub fn new(api_key: impl Into<String>) -> Result<Self, WatsonError> {
        Self::with_builder(api_key, ServiceBuilder::new(NoAuthAuthenticator))
    }

    /// Uses `builder` for everything but credentials, which travel as the
    /// `apikey` query parameter.
    pub fn with_builder(
        api_key: impl Into<String>,
        builder: ServiceBuilder,
    ) -> Result<Self, WatsonError> {
        let api_key = api_key.into();
        require("api_key", &api_key)?;
        Ok(Self {
            base: builder.build(&SERVICE)?,
            api_key,
        })
    }

    async fn call(
        &self,
        operation_id: &str,
        method_name: &str,
        source: &AlchemySource,
        params: Vec<(String, String)>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let (prefix, field, content) = source.route();
        require(field, content)?;

        let mut form = params;
        form.push((field.to_string(), content.to_string()));

        let request = WatsonRequest::new(Method::POST, format!("{prefix}{method_name}"))
            .query("apikey", &self.api_key)
            .query("outputMode", "json")
            .header_value("Accept", "application/json")
            .form(form)
            .with_overrides(headers);
        let response = self.base.send_json(operation_id, request).await?;
        check_alchemy_status(response)
    }

    /// Document-level sentiment, or sentiment towards each of `targets`.
    pub async fn sentiment(
        &self,
        source: &AlchemySource,
        targets: Option<&[String]>,
        language: Option<&str>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let mut params = Vec::new();
        if let Some(language) = language {
            params.push(("language".to_string(), language.to_string()));
        }
        let method_name = match targets {
            Some(targets) if !targets.is_empty() => {
                params.push(("targets".to_string(), targets.join("|")));
                "GetTargetedSentiment"
            }
            _ => "GetTextSentiment",
        };
        self.call("sentiment", method_name, source, params, headers)
            .await
    }

    pub async fn keywords(
        &self,
        source: &AlchemySource,
        options: &ExtractionOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        self.call(
            "keywords",
            "GetRankedKeywords",
            source,
            extraction_params(options),
            headers,
        )
        .await
    }

    pub async fn entities(
        &self,
        source: &AlchemySource,
        options: &ExtractionOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        self.call(
            "entities",
            "GetRankedNamedEntities",
            source,
            extraction_params(options),
            headers,
        )
        .await
    }

    pub async fn concepts(
        &self,
        source: &AlchemySource,
        options: &ExtractionOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        self.call(
            "concepts",
            "GetRankedConcepts",
            source,
            extraction_params(options),
            headers,
        )
        .await
    }

    /// Detects the language of the input.
    pub async fn language(
        &self,
        source: &AlchemySource,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        self.call("language", "GetLanguage", source, Vec::new(), headers)
            .await
    }
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

fn extraction_params(options: &ExtractionOptions) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(max_items) = options.max_items {
        params.push(("maxRetrieve".to_string(), max_items.to_string()));
    }
    if let Some(sentiment) = options.sentiment {
        params.push(("sentiment".to_string(), flag(sentiment)));
    }
    if let Some(emotion) = options.emotion {
        params.push(("emotion".to_string(), flag(emotion)));
    }
    if let Some(language) = &options.language {
        params.push(("language".to_string(), language.clone()));
    }
    params
}

/// Turns an Alchemy `{"status": "ERROR"}` body into [`WatsonError::Api`].
///
/// The status is 400, or 401 for `invalid-api-key`.
pub(crate) fn check_alchemy_status(
    response: DetailedResponse<Value>,
) -> Result<DetailedResponse<Value>, WatsonError> {
    if response.result.get("status").and_then(Value::as_str) != Some("ERROR") {
        return Ok(response);
    }

    let message = response
        .result
        .get("statusInfo")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error")
        .to_string();
    let status_code = if message == "invalid-api-key" { 401 } else { 400 };
    let transaction_id = response
        .headers
        .get(TRANSACTION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    tracing::debug!("Alchemy error in 200 response: {}", message);

    Err(WatsonError::Api {
        status_code,
        message,
        transaction_id,
    })
}
