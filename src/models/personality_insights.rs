//! Personality Insights v3 models.

use super::{Score, impl_model};
use serde::{Deserialize, Serialize};

/// A personality, need or value characteristic. Big Five traits nest their
/// facets in `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Trait {
    pub trait_id: String,
    pub name: String,
    pub category: String,
    pub percentile: Score,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_score: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub significant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Trait>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Behavior {
    pub trait_id: String,
    pub name: String,
    pub category: String,
    pub percentage: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumptionPreferences {
    pub consumption_preference_id: String,
    pub name: String,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumptionPreferencesCategory {
    pub consumption_preference_category_id: String,
    pub name: String,
    pub consumption_preferences: Vec<ConsumptionPreferences>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Warning {
    pub warning_id: String,
    pub message: String,
}

/// Result of `profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub processed_language: String,
    pub word_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count_message: Option<String>,
    pub personality: Vec<Trait>,
    pub needs: Vec<Trait>,
    pub values: Vec<Trait>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<Vec<Behavior>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption_preferences: Option<Vec<ConsumptionPreferencesCategory>>,
    pub warnings: Vec<Warning>,
}

/// One piece of input content for `profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentItem {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Milliseconds since the UNIX epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    /// `text/plain` or `text/html`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contenttype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parentid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward: Option<bool>,
}

impl ContentItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            id: None,
            created: None,
            updated: None,
            contenttype: None,
            language: None,
            parentid: None,
            reply: None,
            forward: None,
        }
    }
}

/// The JSON body of `profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Content {
    #[serde(rename = "contentItems")]
    pub content_items: Vec<ContentItem>,
}

impl_model!(
    Trait,
    Behavior,
    ConsumptionPreferences,
    ConsumptionPreferencesCategory,
    Warning,
    Profile,
    ContentItem,
    Content,
);
