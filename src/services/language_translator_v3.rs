//! Language Translator v3.
//!
//! Translates text and documents, identifies languages, and manages custom
//! translation models trained from glossaries and parallel corpora.

use super::{checked_version, impl_watson_service};
use crate::auth::Authenticator;
use crate::errors::WatsonError;
use crate::http::common::encode_segment;
use crate::request::{
    FileWithMetadata, HeaderOverrides, MultipartBuilder, WatsonRequest, require,
    require_file, require_non_empty,
};
use crate::service::{BaseService, DetailedResponse, ServiceBuilder, ServiceInfo};
use bytes::Bytes;
use reqwest::Method;
use serde_json::{Map, Value, json};

pub const SERVICE: ServiceInfo = ServiceInfo {
    name: "language_translator",
    version: "V3",
    default_url: "https://api.us-south.language-translator.watson.cloud.ibm.com",
};

const OCTET_STREAM: &str = "application/octet-stream";

/// Optional arguments of [`LanguageTranslatorV3::translate`].
///
/// Either `model_id` or both `source` and `target` select the model.
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    pub model_id: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
}

/// Optional arguments of [`LanguageTranslatorV3::list_models`].
#[derive(Debug, Clone, Default)]
pub struct ListModelsOptions {
    pub source: Option<String>,
    pub target: Option<String>,
    /// `true` lists only base models, `false` only custom models.
    pub default: Option<bool>,
}

/// Optional arguments of [`LanguageTranslatorV3::create_model`]. At least
/// one training file is expected by the service.
#[derive(Debug, Clone, Default)]
pub struct CreateModelOptions {
    /// TMX, XLIFF, CSV or TSV glossary whose terms are forced verbatim.
    pub forced_glossary: Option<FileWithMetadata>,
    pub parallel_corpus: Option<FileWithMetadata>,
    pub name: Option<String>,
}

/// Optional arguments of [`LanguageTranslatorV3::translate_document`].
#[derive(Debug, Clone, Default)]
pub struct TranslateDocumentOptions {
    pub model_id: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
    /// Re-translates a previously submitted document.
    pub document_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LanguageTranslatorV3 {
    base: BaseService,
    version: String,
}

impl_watson_service!(LanguageTranslatorV3);

impl LanguageTranslatorV3 {
    /// Creates a client for API version `version` (e.g. `2018-05-01`).
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

    /// Reads credentials from `LANGUAGE_TRANSLATOR_*` environment variables.
    pub fn from_env(version: impl Into<String>) -> Result<Self, WatsonError> {
        Self::with_builder(version, ServiceBuilder::from_env(&SERVICE)?)
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    fn request(&self, method: Method, path: impl Into<String>) -> WatsonRequest {
        WatsonRequest::new(method, path)
            .query("version", &self.version)
            .header_value("Accept", "application/json")
    }

    /// Translates one or more strings.
    pub async fn translate<S: AsRef<str>>(
        &self,
        text: &[S],
        options: &TranslateOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require_non_empty("text", text)?;

        let mut body = Map::new();
        body.insert(
            "text".to_string(),
            json!(text.iter().map(AsRef::as_ref).collect::<Vec<&str>>()),
        );
        for (key, value) in [
            ("model_id", &options.model_id),
            ("source", &options.source),
            ("target", &options.target),
        ] {
            if let Some(value) = value {
                body.insert(key.to_string(), json!(value));
            }
        }

        let request = self
            .request(Method::POST, "/v3/translate")
            .json(Value::Object(body))
            .with_overrides(headers);
        self.base.send_json("translate", request).await
    }

    /// Lists languages supported for translation.
    pub async fn list_languages(
        &self,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = self
            .request(Method::GET, "/v3/languages")
            .with_overrides(headers);
        self.base.send_json("list_languages", request).await
    }

    /// Identifies the language of plain text.
    pub async fn identify(
        &self,
        text: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("text", text)?;
        let request = self
            .request(Method::POST, "/v3/identify")
            .raw("text/plain", Bytes::copy_from_slice(text.as_bytes()))
            .with_overrides(headers);
        self.base.send_json("identify", request).await
    }

    pub async fn list_identifiable_languages(
        &self,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = self
            .request(Method::GET, "/v3/identifiable_languages")
            .with_overrides(headers);
        self.base
            .send_json("list_identifiable_languages", request)
            .await
    }

    /// Trains a custom model on top of `base_model_id`.
    pub async fn create_model(
        &self,
        base_model_id: &str,
        options: CreateModelOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("base_model_id", base_model_id)?;

        let parts = MultipartBuilder::new()
            .file_opt(
                "forced_glossary",
                options
                    .forced_glossary
                    .map(|f| f.or_content_type(OCTET_STREAM)),
            )
            .file_opt(
                "parallel_corpus",
                options
                    .parallel_corpus
                    .map(|f| f.or_content_type(OCTET_STREAM)),
            )
            .build();

        let request = self
            .request(Method::POST, "/v3/models")
            .query("base_model_id", base_model_id)
            .query_opt("name", options.name.as_deref())
            .multipart(parts)
            .with_overrides(headers);
        self.base.send_json("create_model", request).await
    }

    pub async fn delete_model(
        &self,
        model_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("model_id", model_id)?;
        let path = format!("/v3/models/{}", encode_segment(model_id));
        let request = self
            .request(Method::DELETE, path)
            .with_overrides(headers);
        self.base.send_json("delete_model", request).await
    }

    pub async fn get_model(
        &self,
        model_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("model_id", model_id)?;
        let path = format!("/v3/models/{}", encode_segment(model_id));
        let request = self.request(Method::GET, path).with_overrides(headers);
        self.base.send_json("get_model", request).await
    }

    pub async fn list_models(
        &self,
        options: &ListModelsOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = self
            .request(Method::GET, "/v3/models")
            .query_opt("source", options.source.as_deref())
            .query_opt("target", options.target.as_deref())
            .query_opt("default", options.default)
            .with_overrides(headers);
        self.base.send_json("list_models", request).await
    }

    pub async fn list_documents(
        &self,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = self
            .request(Method::GET, "/v3/documents")
            .with_overrides(headers);
        self.base.send_json("list_documents", request).await
    }

    /// Submits a document for asynchronous translation.
    pub async fn translate_document(
        &self,
        file: FileWithMetadata,
        options: TranslateDocumentOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require_file("file", &file)?;

        let parts = MultipartBuilder::new()
            .file("file", file.or_content_type(OCTET_STREAM))
            .text_opt("model_id", options.model_id)
            .text_opt("source", options.source)
            .text_opt("target", options.target)
            .text_opt("document_id", options.document_id)
            .build();

        let request = self
            .request(Method::POST, "/v3/documents")
            .multipart(parts)
            .with_overrides(headers);
        self.base.send_json("translate_document", request).await
    }

    pub async fn get_document_status(
        &self,
        document_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("document_id", document_id)?;
        let path = format!("/v3/documents/{}", encode_segment(document_id));
        let request = self.request(Method::GET, path).with_overrides(headers);
        self.base.send_json("get_document_status", request).await
    }

    pub async fn delete_document(
        &self,
        document_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("document_id", document_id)?;
        let path = format!("/v3/documents/{}", encode_segment(document_id));
        let request = self
            .request(Method::DELETE, path)
            .with_overrides(headers);
        self.base.send_json("delete_document", request).await
    }

    /// Downloads a translated document. `accept` selects the output format
    /// (defaults to the submitted document's format).
    pub async fn get_translated_document(
        &self,
        document_id: &str,
        accept: Option<&str>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Bytes>, WatsonError> {
        require("document_id", document_id)?;
        let path = format!(
            "/v3/documents/{}/translated_document",
            encode_segment(document_id)
        );
        let request = WatsonRequest::new(Method::GET, path)
            .query("version", &self.version)
            .header_opt("Accept", accept)
            .with_overrides(headers);
        self.base.send_bytes("get_translated_document", request).await
    }
}
