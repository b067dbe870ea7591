//! One façade per Watson API, one method per REST endpoint.
//!
//! Every method validates its required arguments before any I/O, omits
//! unset optional arguments from the request, merges the optional per-call
//! header overrides last, and issues exactly one HTTP request.

pub mod alchemy_data_news_v1;
pub mod alchemy_language_v1;
pub mod assistant_v2;
pub mod dialog_v1;
pub mod language_translator_v3;
pub mod personality_insights_v3;
pub mod text_to_speech_v1;
pub mod tone_analyzer_v3;
pub mod visual_recognition_v3;
pub mod visual_recognition_v4;

pub use alchemy_data_news_v1::AlchemyDataNewsV1;
pub use alchemy_language_v1::AlchemyLanguageV1;
pub use assistant_v2::AssistantV2;
pub use dialog_v1::DialogV1;
pub use language_translator_v3::LanguageTranslatorV3;
pub use personality_insights_v3::PersonalityInsightsV3;
pub use text_to_speech_v1::TextToSpeechV1;
pub use tone_analyzer_v3::ToneAnalyzerV3;
pub use visual_recognition_v3::VisualRecognitionV3;
pub use visual_recognition_v4::VisualRecognitionV4;

use crate::errors::WatsonError;
use crate::request::require;
use chrono::NaiveDate;

/// Checks the API version date (`YYYY-MM-DD`) a versioned façade is built with.
pub(crate) fn checked_version(version: String) -> Result<String, WatsonError> {
    require("version", &version)?;
    if version.len() != 10 || NaiveDate::parse_from_str(&version, "%Y-%m-%d").is_err() {
        return Err(WatsonError::InvalidArgument(format!(
            "version must be a date in YYYY-MM-DD format, got '{version}'"
        )));
    }
    Ok(version)
}

/// Implements [`WatsonService`](crate::WatsonService) for a façade holding
/// its transport in a `base` field.
macro_rules! impl_watson_service {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::service::WatsonService for $ty {
                fn base(&self) -> &$crate::service::BaseService {
                    &self.base
                }

                fn base_mut(&mut self) -> &mut $crate::service::BaseService {
                    &mut self.base
                }
            }
        )+
    };
}
pub(crate) use impl_watson_service;
