//! Visual Recognition v4.
//!
//! Object detection against collections of labelled training images.

use super::{checked_version, impl_watson_service};
use crate::auth::Authenticator;
use crate::errors::WatsonError;
use crate::http::common::encode_segment;
use crate::models::visual_recognition::TrainingDataObject;
use crate::request::{
    FileWithMetadata, HeaderOverrides, MultipartBuilder, WatsonRequest, require,
    require_non_empty,
};
use crate::service::{BaseService, DetailedResponse, ServiceBuilder, ServiceInfo};
use reqwest::Method;
use serde_json::{Map, Value, json};

pub const SERVICE: ServiceInfo = ServiceInfo {
    name: "watson_vision_combined",
    version: "V4",
    default_url: "https://api.us-south.visual-recognition.watson.cloud.ibm.com",
};

const OCTET_STREAM: &str = "application/octet-stream";

/// Images for [`VisualRecognitionV4::analyze`] and
/// [`VisualRecognitionV4::add_images`]. Each file and URL is sent as its own
/// multipart part.
#[derive(Debug, Clone, Default)]
pub struct ImageInput {
    pub images_file: Vec<FileWithMetadata>,
    pub image_url: Vec<String>,
}

impl ImageInput {
    fn is_empty(&self) -> bool {
        self.images_file.is_empty() && self.image_url.is_empty()
    }

    fn append_to(self, builder: MultipartBuilder) -> MultipartBuilder {
        let builder = self.images_file.into_iter().fold(builder, |b, file| {
            b.file("images_file", file.or_content_type(OCTET_STREAM))
        });
        self.image_url
            .into_iter()
            .fold(builder, |b, url| b.text("image_url", url))
    }
}

/// Name and description of a collection; unset fields are left unchanged
/// on update.
#[derive(Debug, Clone, Default)]
pub struct CollectionOptions {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CollectionOptions {
    fn to_json(&self) -> Value {
        let mut body = Map::new();
        if let Some(name) = &self.name {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(description) = &self.description {
            body.insert("description".to_string(), json!(description));
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone)]
pub struct VisualRecognitionV4 {
    base: BaseService,
    version: String,
}

impl_watson_service!(VisualRecognitionV4);

impl VisualRecognitionV4 {
    /// Creates a client for API version `version` (e.g. `2019-02-11`).
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

    /// Detects objects in images using the models of `collection_ids`.
    /// `features` currently only accepts `objects`.
    pub async fn analyze<S: AsRef<str>>(
        &self,
        collection_ids: &[S],
        features: &[S],
        images: ImageInput,
        threshold: Option<f64>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require_non_empty("collection_ids", collection_ids)?;
        require_non_empty("features", features)?;
        if images.is_empty() {
            return Err(WatsonError::InvalidArgument(
                "images_file or image_url must be provided".to_string(),
            ));
        }

        let parts = images
            .append_to(
                MultipartBuilder::new()
                    .text("collection_ids", join(collection_ids))
                    .text("features", join(features)),
            )
            .text_opt("threshold", threshold)
            .build();

        let request = self
            .request(Method::POST, "/v4/analyze")
            .multipart(parts)
            .with_overrides(headers);
        self.base.send_json("analyze", request).await
    }

    pub async fn create_collection(
        &self,
        options: &CollectionOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = self
            .request(Method::POST, "/v4/collections")
            .json(options.to_json())
            .with_overrides(headers);
        self.base.send_json("create_collection", request).await
    }

    pub async fn list_collections(
        &self,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = self
            .request(Method::GET, "/v4/collections")
            .with_overrides(headers);
        self.base.send_json("list_collections", request).await
    }

    pub async fn get_collection(
        &self,
        collection_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("collection_id", collection_id)?;
        let request = self
            .request(Method::GET, collection_path(collection_id))
            .with_overrides(headers);
        self.base.send_json("get_collection", request).await
    }

    pub async fn update_collection(
        &self,
        collection_id: &str,
        options: &CollectionOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("collection_id", collection_id)?;
        let request = self
            .request(Method::POST, collection_path(collection_id))
            .json(options.to_json())
            .with_overrides(headers);
        self.base.send_json("update_collection", request).await
    }

    pub async fn delete_collection(
        &self,
        collection_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("collection_id", collection_id)?;
        let request = self
            .request(Method::DELETE, collection_path(collection_id))
            .with_overrides(headers);
        self.base.send_json("delete_collection", request).await
    }

    /// Adds images to a collection, optionally with training data applied
    /// to all of them (a JSON object with an `objects` array).
    pub async fn add_images(
        &self,
        collection_id: &str,
        images: ImageInput,
        training_data: Option<&Value>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("collection_id", collection_id)?;
        if images.is_empty() {
            return Err(WatsonError::InvalidArgument(
                "images_file or image_url must be provided".to_string(),
            ));
        }

        let training_data = training_data.map(serde_json::to_string).transpose()?;
        let parts = images
            .append_to(MultipartBuilder::new())
            .text_opt("training_data", training_data)
            .build();

        let request = self
            .request(
                Method::POST,
                format!("{}/images", collection_path(collection_id)),
            )
            .multipart(parts)
            .with_overrides(headers);
        self.base.send_json("add_images", request).await
    }

    pub async fn list_images(
        &self,
        collection_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("collection_id", collection_id)?;
        let request = self
            .request(
                Method::GET,
                format!("{}/images", collection_path(collection_id)),
            )
            .with_overrides(headers);
        self.base.send_json("list_images", request).await
    }

    pub async fn get_image_details(
        &self,
        collection_id: &str,
        image_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("collection_id", collection_id)?;
        require("image_id", image_id)?;
        let request = self
            .request(Method::GET, image_path(collection_id, image_id))
            .with_overrides(headers);
        self.base.send_json("get_image_details", request).await
    }

    pub async fn delete_image(
        &self,
        collection_id: &str,
        image_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("collection_id", collection_id)?;
        require("image_id", image_id)?;
        let request = self
            .request(Method::DELETE, image_path(collection_id, image_id))
            .with_overrides(headers);
        self.base.send_json("delete_image", request).await
    }

    /// Starts training a collection's object detection model.
    pub async fn train(
        &self,
        collection_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("collection_id", collection_id)?;
        let request = self
            .request(
                Method::POST,
                format!("{}/train", collection_path(collection_id)),
            )
            .with_overrides(headers);
        self.base.send_json("train", request).await
    }

    /// Replaces the training data of one image.
    pub async fn add_image_training_data(
        &self,
        collection_id: &str,
        image_id: &str,
        objects: &[TrainingDataObject],
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("collection_id", collection_id)?;
        require("image_id", image_id)?;
        let request = self
            .request(
                Method::POST,
                format!("{}/training_data", image_path(collection_id, image_id)),
            )
            .json(json!({ "objects": objects }))
            .with_overrides(headers);
        self.base
            .send_json("add_image_training_data", request)
            .await
    }

    /// Reports training usage between two dates (`YYYY-MM-DD`).
    pub async fn get_training_usage(
        &self,
        start_time: Option<&str>,
        end_time: Option<&str>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = self
            .request(Method::GET, "/v4/training_usage")
            .query_opt("start_time", start_time)
            .query_opt("end_time", end_time)
            .with_overrides(headers);
        self.base.send_json("get_training_usage", request).await
    }

    pub async fn delete_user_data(
        &self,
        customer_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("customer_id", customer_id)?;
        let request = self
            .request(Method::DELETE, "/v4/user_data")
            .query("customer_id", customer_id)
            .with_overrides(headers);
        self.base.send_json("delete_user_data", request).await
    }
}

fn collection_path(collection_id: &str) -> String {
    format!("/v4/collections/{}", encode_segment(collection_id))
}

fn image_path(collection_id: &str, image_id: &str) -> String {
    format!(
        "{}/images/{}",
        collection_path(collection_id),
        encode_segment(image_id)
    )
}

fn join<S: AsRef<str>>(values: &[S]) -> String {
    values.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}
