//! Typed response and request models.
//!
//! Every endpoint returns its raw JSON in [`DetailedResponse`]; the types
//! here are the strict, typed view of the most commonly used shapes.
//! Conversion is strict in both directions:
//!
//! - a required field missing from the JSON fails,
//! - a field the model does not declare fails,
//! - unset optional fields are not serialized, so
//!   `to_dict(from_dict(d)) == d` for any `d` holding declared fields only.
//!
//! An explicit `null` for an optional field reads as absent and is not
//! written back. Numeric scores keep their JSON form through [`Score`].
//!
//! [`DetailedResponse`]: crate::DetailedResponse

use crate::errors::WatsonError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub mod assistant;
pub mod language_translator;
pub mod personality_insights;
pub mod text_to_speech;
pub mod tone_analyzer;
pub mod visual_recognition;

/// Conversion between a model and its JSON dictionary form.
pub trait Model: Serialize + DeserializeOwned {
    /// Builds the model from JSON, rejecting missing required fields and
    /// undeclared fields.
    ///
    /// # Errors
    ///
    /// Returns [`WatsonError::Validation`] naming the model and the offending
    /// field.
    fn from_dict(value: Value) -> Result<Self, WatsonError> {
        serde_json::from_value(value).map_err(|e| {
            WatsonError::Validation(format!("{}: {e}", short_type_name::<Self>()))
        })
    }

    /// Serializes the model, omitting unset optional fields.
    fn to_dict(&self) -> Result<Value, WatsonError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// A score, confidence or percentile exactly as Watson sent it.
///
/// Holds the JSON number rather than an `f64`, so an integral `1` is written
/// back as `1` and not `1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(Number);

impl Score {
    /// The score as a float.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0.as_f64().unwrap_or(f64::NAN)
    }

    #[must_use]
    pub fn as_number(&self) -> &Number {
        &self.0
    }
}

impl From<Number> for Score {
    fn from(number: Number) -> Self {
        Self(number)
    }
}

impl From<i64> for Score {
    fn from(value: i64) -> Self {
        Self(Number::from(value))
    }
}

impl TryFrom<f64> for Score {
    type Error = WatsonError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Number::from_f64(value)
            .map(Self)
            .ok_or_else(|| WatsonError::InvalidArgument(format!("score must be finite, got {value}")))
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Implements [`Model`] for each listed type.
macro_rules! impl_model {
    ($($ty:ty),+ $(,)?) => {
        $(impl $crate::models::Model for $ty {})+
    };
}
pub(crate) use impl_model;
