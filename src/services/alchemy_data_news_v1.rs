//! AlchemyData News v1 (deprecated).
//!
//! Queries a news index enriched with entities, keywords and sentiment.

use super::alchemy_language_v1::check_alchemy_status;
use super::impl_watson_service;
use crate::auth::NoAuthAuthenticator;
use crate::errors::WatsonError;
use crate::request::{HeaderOverrides, WatsonRequest, require};
use crate::service::{BaseService, DetailedResponse, ServiceBuilder, ServiceInfo};
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;

pub const SERVICE: ServiceInfo = ServiceInfo {
    name: "alchemy_data_news",
    version: "V1",
    default_url: "https://gateway-a.watsonplatform.net/calls",
};

/// Arguments of [`AlchemyDataNewsV1::get_news`].
#[derive(Debug, Clone, Default)]
pub struct NewsQuery {
    /// Start of the time window, e.g. `now-7d`.
    pub start: Option<String>,
    /// End of the time window, e.g. `now`.
    pub end: Option<String>,
    pub max_results: Option<u32>,
    /// Fields to return, e.g. `enriched.url.title`.
    pub return_fields: Option<Vec<String>>,
    /// Free-form query parameters, e.g. `q.enriched.url.title` → `IBM`.
    pub query: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct AlchemyDataNewsV1 {
    base: BaseService,
    api_key: String,
}

impl_watson_service!(AlchemyDataNewsV1);

impl AlchemyDataNewsV1 {
    pub fn new(api_key: impl Into<String>) -> Result<Self, WatsonError> {
        Self::with_builder(api_key, ServiceBuilder::new(NoAuthAuthenticator))
    }

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

    pub async fn get_news(
        &self,
        query: &NewsQuery,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let mut request = WatsonRequest::new(Method::GET, "/data/GetNews")
            .query("apikey", &self.api_key)
            .query("outputMode", "json")
            .query_opt("start", query.start.as_deref())
            .query_opt("end", query.end.as_deref())
            .query_opt("maxResults", query.max_results)
            .query_list("return", query.return_fields.as_deref())
            .header_value("Accept", "application/json");
        for (key, value) in &query.query {
            request = request.query(key, value);
        }

        let response = self
            .base
            .send_json("get_news", request.with_overrides(headers))
            .await?;
        check_alchemy_status(response)
    }
}
