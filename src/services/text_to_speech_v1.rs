//! Text to Speech v1.
//!
//! Synthesizes audio from text and manages custom voice models that
//! override the pronunciation of individual words.

use super::impl_watson_service;
use crate::auth::Authenticator;
use crate::errors::WatsonError;
use crate::http::common::encode_segment;
use crate::models::text_to_speech::Word;
use crate::request::{HeaderOverrides, WatsonRequest, require, require_non_empty};
use crate::service::{BaseService, DetailedResponse, ServiceBuilder, ServiceInfo};
use bytes::Bytes;
use reqwest::Method;
use serde_json::{Map, Value, json};

pub const SERVICE: ServiceInfo = ServiceInfo {
    name: "text_to_speech",
    version: "V1",
    default_url: "https://api.us-south.text-to-speech.watson.cloud.ibm.com",
};

/// Optional arguments of [`TextToSpeechV1::synthesize`].
#[derive(Debug, Clone, Default)]
pub struct SynthesizeOptions {
    /// Audio format, e.g. `audio/wav` or `audio/ogg;codecs=opus` (the
    /// service default).
    pub accept: Option<String>,
    pub voice: Option<String>,
    pub customization_id: Option<String>,
}

/// Optional arguments of [`TextToSpeechV1::get_pronunciation`].
#[derive(Debug, Clone, Default)]
pub struct PronunciationOptions {
    pub voice: Option<String>,
    /// `ipa` (default) or `ibm`.
    pub format: Option<String>,
    pub customization_id: Option<String>,
}

/// Fields of a custom model; on update, unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CustomModelOptions {
    pub language: Option<String>,
    pub description: Option<String>,
}

/// Optional arguments of [`TextToSpeechV1::update_custom_model`].
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomModelOptions {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Words to add or update.
    pub words: Option<Vec<Word>>,
}

#[derive(Debug, Clone)]
pub struct TextToSpeechV1 {
    base: BaseService,
}

impl_watson_service!(TextToSpeechV1);

impl TextToSpeechV1 {
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

    pub async fn list_voices(
        &self,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = Self::request(Method::GET, "/v1/voices").with_overrides(headers);
        self.base.send_json("list_voices", request).await
    }

    /// Gets one voice; with `customization_id`, the custom model is included.
    pub async fn get_voice(
        &self,
        voice: &str,
        customization_id: Option<&str>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("voice", voice)?;
        let request = Self::request(Method::GET, format!("/v1/voices/{}", encode_segment(voice)))
            .query_opt("customization_id", customization_id)
            .with_overrides(headers);
        self.base.send_json("get_voice", request).await
    }

    /// Synthesizes `text` to audio in the format selected by `accept`.
    pub async fn synthesize(
        &self,
        text: &str,
        options: &SynthesizeOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Bytes>, WatsonError> {
        require("text", text)?;
        let request = WatsonRequest::new(Method::POST, "/v1/synthesize")
            .query_opt("voice", options.voice.as_deref())
            .query_opt("customization_id", options.customization_id.as_deref())
            .header_opt("Accept", options.accept.as_deref())
            .json(json!({ "text": text }))
            .with_overrides(headers);
        self.base.send_bytes("synthesize", request).await
    }

    /// Gets the phonetic pronunciation of a word.
    pub async fn get_pronunciation(
        &self,
        text: &str,
        options: &PronunciationOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("text", text)?;
        let request = Self::request(Method::GET, "/v1/pronunciation")
            .query("text", text)
            .query_opt("voice", options.voice.as_deref())
            .query_opt("format", options.format.as_deref())
            .query_opt("customization_id", options.customization_id.as_deref())
            .with_overrides(headers);
        self.base.send_json("get_pronunciation", request).await
    }

    pub async fn create_custom_model(
        &self,
        name: &str,
        options: &CustomModelOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("name", name)?;
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        if let Some(language) = &options.language {
            body.insert("language".to_string(), json!(language));
        }
        if let Some(description) = &options.description {
            body.insert("description".to_string(), json!(description));
        }

        let request = Self::request(Method::POST, "/v1/customizations")
            .json(Value::Object(body))
            .with_overrides(headers);
        self.base.send_json("create_custom_model", request).await
    }

    pub async fn list_custom_models(
        &self,
        language: Option<&str>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let request = Self::request(Method::GET, "/v1/customizations")
            .query_opt("language", language)
            .with_overrides(headers);
        self.base.send_json("list_custom_models", request).await
    }

    pub async fn update_custom_model(
        &self,
        customization_id: &str,
        options: &UpdateCustomModelOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("customization_id", customization_id)?;
        let mut body = Map::new();
        if let Some(name) = &options.name {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(description) = &options.description {
            body.insert("description".to_string(), json!(description));
        }
        if let Some(words) = &options.words {
            body.insert("words".to_string(), serde_json::to_value(words)?);
        }

        let request = Self::request(Method::POST, customization_path(customization_id))
            .json(Value::Object(body))
            .with_overrides(headers);
        self.base.send_json("update_custom_model", request).await
    }

    pub async fn get_custom_model(
        &self,
        customization_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("customization_id", customization_id)?;
        let request = Self::request(Method::GET, customization_path(customization_id))
            .with_overrides(headers);
        self.base.send_json("get_custom_model", request).await
    }

    pub async fn delete_custom_model(
        &self,
        customization_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("customization_id", customization_id)?;
        let request = Self::request(Method::DELETE, customization_path(customization_id))
            .with_overrides(headers);
        self.base.send_json("delete_custom_model", request).await
    }

    /// Adds or replaces several words of a custom model.
    pub async fn add_words(
        &self,
        customization_id: &str,
        words: &[Word],
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("customization_id", customization_id)?;
        require_non_empty("words", words)?;
        let request = Self::request(
            Method::POST,
            format!("{}/words", customization_path(customization_id)),
        )
        .json(json!({ "words": words }))
        .with_overrides(headers);
        self.base.send_json("add_words", request).await
    }

    pub async fn list_words(
        &self,
        customization_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("customization_id", customization_id)?;
        let request = Self::request(
            Method::GET,
            format!("{}/words", customization_path(customization_id)),
        )
        .with_overrides(headers);
        self.base.send_json("list_words", request).await
    }

    /// Adds or replaces one word of a custom model.
    pub async fn add_word(
        &self,
        customization_id: &str,
        word: &str,
        translation: &str,
        part_of_speech: Option<&str>,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("customization_id", customization_id)?;
        require("word", word)?;
        require("translation", translation)?;

        let mut body = Map::new();
        body.insert("translation".to_string(), json!(translation));
        if let Some(part_of_speech) = part_of_speech {
            body.insert("part_of_speech".to_string(), json!(part_of_speech));
        }

        let request = Self::request(Method::PUT, word_path(customization_id, word))
            .json(Value::Object(body))
            .with_overrides(headers);
        self.base.send_json("add_word", request).await
    }

    pub async fn get_word(
        &self,
        customization_id: &str,
        word: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("customization_id", customization_id)?;
        require("word", word)?;
        let request = Self::request(Method::GET, word_path(customization_id, word))
            .with_overrides(headers);
        self.base.send_json("get_word", request).await
    }

    pub async fn delete_word(
        &self,
        customization_id: &str,
        word: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("customization_id", customization_id)?;
        require("word", word)?;
        let request = Self::request(Method::DELETE, word_path(customization_id, word))
            .with_overrides(headers);
        self.base.send_json("delete_word", request).await
    }

    pub async fn delete_user_data(
        &self,
        customer_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("customer_id", customer_id)?;
        let request = Self::request(Method::DELETE, "/v1/user_data")
            .query("customer_id", customer_id)
            .with_overrides(headers);
        self.base.send_json("delete_user_data", request).await
    }
}

fn customization_path(customization_id: &str) -> String {
    format!("/v1/customizations/{}", encode_segment(customization_id))
}

fn word_path(customization_id: &str, word: &str) -> String {
    format!(
        "{}/words/{}",
        customization_path(customization_id),
        encode_segment(word)
    )
}
