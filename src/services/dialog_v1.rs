//! Dialog v1 (deprecated).
//!
//! Scripted conversations defined by uploaded dialog files, with per-client
//! profile variables.

use super::impl_watson_service;
use crate::auth::Authenticator;
use crate::errors::WatsonError;
use crate::http::common::encode_segment;
use crate::request::{
    FileWithMetadata, HeaderOverrides, MultipartBuilder, WatsonRequest, require, require_file,
    require_non_empty,
};
use crate::service::{BaseService, DetailedResponse, ServiceBuilder, ServiceInfo};
use reqwest::Method;
use serde_json::{Map, Value, json};

pub const SERVICE: ServiceInfo = ServiceInfo {
    name: "dialog",
    version: "V1",
    default_url: "https://gateway.watsonplatform.net/dialog/api",
};

/// Identifies an ongoing conversation in [`DialogV1::converse`]. Both are
/// unset on the first turn and returned by the service.
#[derive(Debug, Clone, Default)]
pub struct ConverseOptions {
    pub client_id: Option<String>,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DialogV1 {
    base: BaseService,
}

impl_watson_service!(DialogV1);

impl DialogV1 {
    pub fn new(authenticator: impl Authenticator + 'static) -> Result<Self, WatsonError> {
        Self::with_builder(ServiceBuilder::new(authenticator))
    }

    pub fn with_builder(builder: ServiceBuilder) -> Result<Self, WatsonError> {
        Ok(Self {
            base: builder.build(&SERVICE)?,
        })
    }

    pub fn from_env() -> Result<Self, WatsonError> {
        Self::with_builder(ServiceBuilder::from_env(&SERVICE)?)
    }

    fn request(method: Method, path: impl Into<String>) -> WatsonRequest {
        WatsonRequest::new(method, path).header_value("Accept", "application/json")
    }

    pub async fn get_dialogs(
        &self,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = Self::request(Method::GET, "/v1/dialogs").with_overrides(headers);
        self.base.send_json("get_dialogs", request).await
    }

    /// Uploads a dialog file (XML or JSON) under a unique name.
    pub async fn create_dialog(
        &self,
        name: &str,
        dialog_file: FileWithMetadata,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("name", name)?;
        require_file("dialog_file", &dialog_file)?;

        let parts = MultipartBuilder::new()
            .file("file", dialog_file.or_content_type("application/octet-stream"))
            .text("name", name)
            .build();
        let request = Self::request(Method::POST, "/v1/dialogs")
            .multipart(parts)
            .with_overrides(headers);
        self.base.send_json("create_dialog", request).await
    }

    pub async fn delete_dialog(
        &self,
        dialog_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("dialog_id", dialog_id)?;
        let request =
            Self::request(Method::DELETE, dialog_path(dialog_id)).with_overrides(headers);
        self.base.send_json("delete_dialog", request).await
    }

    /// Sends one user turn and returns the dialog's response.
    pub async fn converse(
        &self,
        dialog_id: &str,
        input: Option<&str>,
        options: &ConverseOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("dialog_id", dialog_id)?;

        let mut form = Vec::new();
        if let Some(input) = input {
            form.push(("input".to_string(), input.to_string()));
        }
        if let Some(client_id) = &options.client_id {
            form.push(("client_id".to_string(), client_id.clone()));
        }
        if let Some(conversation_id) = &options.conversation_id {
            form.push(("conversation_id".to_string(), conversation_id.clone()));
        }

        let request = Self::request(
            Method::POST,
            format!("{}/conversation", dialog_path(dialog_id)),
        )
        .form(form)
        .with_overrides(headers);
        self.base.send_json("converse", request).await
    }

    /// Reads profile variables of a client; `names` restricts which ones.
    pub async fn get_profile(
        &self,
        dialog_id: &str,
        client_id: &str,
        names: Option<&[String]>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("dialog_id", dialog_id)?;
        require("client_id", client_id)?;

        let mut request = Self::request(
            Method::GET,
            format!("{}/profile", dialog_path(dialog_id)),
        )
        .query("client_id", client_id);
        for name in names.unwrap_or_default() {
            request = request.query("name", name);
        }

        self.base
            .send_json("get_profile", request.with_overrides(headers))
            .await
    }

    /// Sets profile variables, in order. Without `client_id`, the service
    /// creates a new client.
    pub async fn update_profile(
        &self,
        dialog_id: &str,
        name_values: &[(String, String)],
        client_id: Option<&str>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("dialog_id", dialog_id)?;
        require_non_empty("name_values", name_values)?;

        let mut body = Map::new();
        if let Some(client_id) = client_id {
            body.insert("client_id".to_string(), json!(client_id));
        }
        body.insert(
            "name_values".to_string(),
            Value::Array(
                name_values
                    .iter()
                    .map(|(name, value)| json!({ "name": name, "value": value }))
                    .collect(),
            ),
        );

        let request = Self::request(Method::PUT, format!("{}/profile", dialog_path(dialog_id)))
            .json(Value::Object(body))
            .with_overrides(headers);
        self.base.send_json("update_profile", request).await
    }
}

fn dialog_path(dialog_id: &str) -> String {
    format!("/v1/dialogs/{}", encode_segment(dialog_id))
}
