//! Visual Recognition v3.
//!
//! Classifies images with the built-in classifiers or custom classifiers
//! trained from zipped example images.

use super::{checked_version, impl_watson_service};
use crate::auth::Authenticator;
use crate::errors::WatsonError;
use crate::http::common::encode_segment;
use crate::request::{
    FileWithMetadata, FormPart, HeaderOverrides, MultipartBuilder, WatsonRequest, require,
};
use crate::service::{BaseService, DetailedResponse, ServiceBuilder, ServiceInfo};
use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;

pub const SERVICE: ServiceInfo = ServiceInfo {
    name: "watson_vision_combined",
    version: "V3",
    default_url: "https://api.us-south.visual-recognition.watson.cloud.ibm.com",
};

const OCTET_STREAM: &str = "application/octet-stream";

/// Arguments of [`VisualRecognitionV3::classify`]. One of `images_file`
/// and `url` is required.
#[derive(Debug, Clone, Default)]
pub struct ClassifyOptions {
    /// An image or a zip of up to 20 images.
    pub images_file: Option<FileWithMetadata>,
    pub url: Option<String>,
    /// Minimum score a class must have to be returned (0.0 to 1.0).
    pub threshold: Option<f64>,
    /// `IBM`, `me`, or both.
    pub owners: Option<Vec<String>>,
    pub classifier_ids: Option<Vec<String>>,
    pub accept_language: Option<String>,
}

/// Training data for [`VisualRecognitionV3::update_classifier`].
#[derive(Debug, Clone, Default)]
pub struct UpdateClassifierOptions {
    /// Zip of positive examples keyed by class name.
    pub positive_examples: BTreeMap<String, FileWithMetadata>,
    pub negative_examples: Option<FileWithMetadata>,
}

#[derive(Debug, Clone)]
pub struct VisualRecognitionV3 {
    base: BaseService,
    version: String,
}

impl_watson_service!(VisualRecognitionV3);

impl VisualRecognitionV3 {
    /// Creates a client for API version `version` (e.g. `2018-03-19`).
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

    fn request(&self, method: Method, path: impl Into<String>) -> WatsonRequest {
        WatsonRequest::new(method, path)
            .query("version", &self.version)
            .header_value("Accept", "application/json")
    }

    pub async fn classify(
        &self,
        options: ClassifyOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        if options.images_file.is_none() && options.url.is_none() {
            return Err(WatsonError::InvalidArgument(
                "images_file or url must be provided".to_string(),
            ));
        }

        let parts = MultipartBuilder::new()
            .file_opt(
                "images_file",
                options.images_file.map(|f| f.or_content_type(OCTET_STREAM)),
            )
            .text_opt("url", options.url)
            .text_opt("threshold", options.threshold)
            .text_opt("owners", options.owners.map(|o| o.join(",")))
            .text_opt("classifier_ids", options.classifier_ids.map(|c| c.join(",")))
            .build();

        let request = self
            .request(Method::POST, "/v3/classify")
            .header_opt("Accept-Language", options.accept_language.as_deref())
            .multipart(parts)
            .with_overrides(headers);
        self.base.send_json("classify", request).await
    }

    /// Trains a custom classifier. Each class needs a zip of at least 10
    /// positive example images.
    pub async fn create_classifier(
        &self,
        name: &str,
        positive_examples: BTreeMap<String, FileWithMetadata>,
        negative_examples: Option<FileWithMetadata>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("name", name)?;
        if positive_examples.is_empty() {
            return Err(WatsonError::InvalidArgument(
                "positive_examples must be provided".to_string(),
            ));
        }

        let parts = training_parts(
            MultipartBuilder::new().text("name", name),
            positive_examples,
            negative_examples,
        );

        let request = self
            .request(Method::POST, "/v3/classifiers")
            .multipart(parts)
            .with_overrides(headers);
        self.base.send_json("create_classifier", request).await
    }

    pub async fn list_classifiers(
        &self,
        verbose: Option<bool>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = self
            .request(Method::GET, "/v3/classifiers")
            .query_opt("verbose", verbose)
            .with_overrides(headers);
        self.base.send_json("list_classifiers", request).await
    }

    pub async fn get_classifier(
        &self,
        classifier_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("classifier_id", classifier_id)?;
        let path = format!("/v3/classifiers/{}", encode_segment(classifier_id));
        let request = self.request(Method::GET, path).with_overrides(headers);
        self.base.send_json("get_classifier", request).await
    }

    /// Adds classes or examples to a classifier, which is then retrained.
    pub async fn update_classifier(
        &self,
        classifier_id: &str,
        options: UpdateClassifierOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("classifier_id", classifier_id)?;

        let parts = training_parts(
            MultipartBuilder::new(),
            options.positive_examples,
            options.negative_examples,
        );

        let path = format!("/v3/classifiers/{}", encode_segment(classifier_id));
        let request = self
            .request(Method::POST, path)
            .multipart(parts)
            .with_overrides(headers);
        self.base.send_json("update_classifier", request).await
    }

    pub async fn delete_classifier(
        &self,
        classifier_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("classifier_id", classifier_id)?;
        let path = format!("/v3/classifiers/{}", encode_segment(classifier_id));
        let request = self.request(Method::DELETE, path).with_overrides(headers);
        self.base.send_json("delete_classifier", request).await
    }

    /// Downloads a classifier as an Apple Core ML model.
    pub async fn get_core_ml_model(
        &self,
        classifier_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Bytes>, WatsonError> {
        require("classifier_id", classifier_id)?;
        let path = format!(
            "/v3/classifiers/{}/core_ml_model",
            encode_segment(classifier_id)
        );
        let request = WatsonRequest::new(Method::GET, path)
            .query("version", &self.version)
            .header_value("Accept", OCTET_STREAM)
            .with_overrides(headers);
        self.base.send_bytes("get_core_ml_model", request).await
    }

    /// Deletes all data tagged with `customer_id`.
    pub async fn delete_user_data(
        &self,
        customer_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("customer_id", customer_id)?;
        let request = self
            .request(Method::DELETE, "/v3/user_data")
            .query("customer_id", customer_id)
            .with_overrides(headers);
        self.base.send_json("delete_user_data", request).await
    }
}

/// Appends `{class}_positive_examples` and `negative_examples` parts.
fn training_parts(
    builder: MultipartBuilder,
    positive_examples: BTreeMap<String, FileWithMetadata>,
    negative_examples: Option<FileWithMetadata>,
) -> Vec<FormPart> {
    let builder = positive_examples
        .into_iter()
        .fold(builder, |builder, (class, file)| {
            builder.file(
                &format!("{class}_positive_examples"),
                file.or_content_type(OCTET_STREAM),
            )
        });
    builder
        .file_opt(
            "negative_examples",
            negative_examples.map(|f| f.or_content_type(OCTET_STREAM)),
        )
        .build()
}
