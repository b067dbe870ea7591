//! Text to Speech v1 models.

use super::impl_model;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupportedFeatures {
    pub custom_pronunciation: bool,
    pub voice_transformation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Voice {
    pub url: String,
    pub gender: String,
    pub name: String,
    pub language: String,
    pub description: String,
    pub customizable: bool,
    pub supported_features: SupportedFeatures,
    /// Only present when `get_voice` is called with a customization ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<CustomModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Voices {
    pub voices: Vec<Voice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pronunciation {
    pub pronunciation: String,
}

/// A word and its custom translation (sounds-like or phonetic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Word {
    pub word: String,
    pub translation: String,
    /// Japanese only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
}

impl Word {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
            part_of_speech: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Words {
    pub words: Vec<Word>,
}

/// Result of `get_word`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Translation {
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
}

/// A custom voice model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomModel {
    pub customization_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomModels {
    pub customizations: Vec<CustomModel>,
}

impl_model!(
    SupportedFeatures,
    Voice,
    Voices,
    Pronunciation,
    Word,
    Words,
    Translation,
    CustomModel,
    CustomModels,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Model;
    use serde_json::json;

    #[test]
    fn test_voice_round_trip() {
        let dict = json!({
            "url": "https://example.test/v1/voices/en-US_AllisonV3Voice",
            "gender": "female",
            "name": "en-US_AllisonV3Voice",
            "language": "en-US",
            "description": "Allison: American English female voice.",
            "customizable": true,
            "supported_features": {"custom_pronunciation": true, "voice_transformation": false}
        });
        let voice = Voice::from_dict(dict.clone()).unwrap();
        assert!(voice.supported_features.custom_pronunciation);
        assert_eq!(voice.to_dict().unwrap(), dict);
    }

    #[test]
    fn test_custom_model_with_words() {
        let dict = json!({
            "customization_id": "cid",
            "name": "my model",
            "words": [{"word": "IBM", "translation": "eye bee em"}]
        });
        let model = CustomModel::from_dict(dict.clone()).unwrap();
        assert_eq!(model.words.as_ref().unwrap()[0], Word::new("IBM", "eye bee em"));
        assert_eq!(model.to_dict().unwrap(), dict);
    }

    #[test]
    fn test_supported_features_requires_both() {
        assert!(SupportedFeatures::from_dict(json!({"custom_pronunciation": true})).is_err());
    }
}
