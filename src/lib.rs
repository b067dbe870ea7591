//! Async Rust client for IBM Watson REST services.
//!
//! Each Watson API is a façade with one method per REST endpoint:
//!
//! | Façade | API |
//! |--------|-----|
//! | [`LanguageTranslatorV3`] | Language Translator v3 |
//! | [`ToneAnalyzerV3`] | Tone Analyzer v3 |
//! | [`PersonalityInsightsV3`] | Personality Insights v3 |
//! | [`VisualRecognitionV3`], [`VisualRecognitionV4`] | Visual Recognition |
//! | [`TextToSpeechV1`] | Text to Speech v1 |
//! | [`AssistantV2`] | Assistant v2, including SSE message streaming |
//! | [`AlchemyLanguageV1`], [`AlchemyDataNewsV1`], [`DialogV1`] | deprecated services |
//!
//! Every call returns a [`DetailedResponse`] holding the status code, the
//! response headers and the decoded body. JSON bodies can be converted into
//! the strict typed models of [`models`] with
//! [`DetailedResponse::into_model`].
//!
//! # Example
//!
//! ```no_run
//! use ibm_watson::{BasicAuthenticator, LanguageTranslatorV3, TranslateOptions};
//! use ibm_watson::models::language_translator::TranslationResult;
//!
//! # async fn run() -> Result<(), ibm_watson::WatsonError> {
//! let translator = LanguageTranslatorV3::new(
//!     "2018-05-01",
//!     BasicAuthenticator::new("apikey", "my-api-key")?,
//! )?;
//!
//! let options = TranslateOptions {
//!     model_id: Some("en-es".to_string()),
//!     ..Default::default()
//! };
//! let result: TranslationResult = translator
//!     .translate(&["Hello, world"], &options, None)
//!     .await?
//!     .into_model()?;
//! println!("{}", result.translations[0].translation);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Façades are configured with a [`ServiceBuilder`] (service URL, timeouts,
//! default headers) or from `<SERVICE_NAME>_*` environment variables via
//! `from_env`. Set `WATSON_LOUD_WIRE=1` to print every request, response and
//! SSE event to stderr.

pub mod auth;
pub mod config;
pub mod errors;
pub(crate) mod http;
pub mod models;
pub mod request;
pub mod service;
pub mod services;

pub use auth::{
    Authenticator, BasicAuthenticator, BearerTokenAuthenticator, NoAuthAuthenticator,
};
pub use config::{SdkInfo, ServiceCredentials};
pub use errors::WatsonError;
pub use http::sse_parser::{
    SseDecoder, SseEvent, SseEvents, decode_lines, parse_sse_stream, parse_sse_stream_as,
};
pub use models::{Model, Score};
pub use models::assistant::MessageInput;
pub use request::{FileWithMetadata, FormPart, HeaderOverrides, RequestBody, WatsonRequest};
pub use service::{BaseService, DetailedResponse, ServiceBuilder, ServiceInfo, WatsonService};
pub use services::alchemy_data_news_v1::NewsQuery;
pub use services::alchemy_language_v1::{AlchemySource, ExtractionOptions};
pub use services::assistant_v2::MessageOptions;
pub use services::language_translator_v3::TranslateOptions;
pub use services::personality_insights_v3::{ProfileContent, ProfileOptions};
pub use services::tone_analyzer_v3::{ToneInput, ToneOptions};
pub use services::{
    AlchemyDataNewsV1, AlchemyLanguageV1, AssistantV2, DialogV1, LanguageTranslatorV3,
    PersonalityInsightsV3, TextToSpeechV1, ToneAnalyzerV3, VisualRecognitionV3,
    VisualRecognitionV4,
};
