//! Tone Analyzer v3 models.

use super::{Score, impl_model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToneScore {
    pub score: Score,
    pub tone_id: String,
    pub tone_name: String,
}

/// Tones grouped by category (only returned when `tones` is not set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToneCategory {
    pub tones: Vec<ToneScore>,
    pub category_id: String,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tones: Option<Vec<ToneScore>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_categories: Option<Vec<ToneCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentenceAnalysis {
    pub sentence_id: i64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tones: Option<Vec<ToneScore>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_categories: Option<Vec<ToneCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_from: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_to: Option<i64>,
}

/// Result of `tone`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToneAnalysis {
    pub document_tone: DocumentAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentences_tone: Option<Vec<SentenceAnalysis>>,
}

/// One chat utterance sent to `tone_chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Utterance {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user: None,
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UtteranceAnalysis {
    pub utterance_id: i64,
    pub utterance_text: String,
    pub tones: Vec<ToneScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of `tone_chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UtteranceAnalyses {
    pub utterances_tone: Vec<UtteranceAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl_model!(
    ToneScore,
    ToneCategory,
    DocumentAnalysis,
    SentenceAnalysis,
    ToneAnalysis,
    Utterance,
    UtteranceAnalysis,
    UtteranceAnalyses,
);
