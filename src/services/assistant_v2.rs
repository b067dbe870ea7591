//! Assistant v2.
//!
//! Sessions and messages for a deployed assistant, including the streamed
//! variant that delivers partial responses as Server-Sent Events.

use super::{checked_version, impl_watson_service};
use crate::auth::Authenticator;
use crate::errors::WatsonError;
use crate::http::common::encode_segment;
use crate::http::sse_parser::SseEvent;
use crate::models::assistant::MessageInput;
use crate::request::{HeaderOverrides, WatsonRequest, require};
use crate::service::{BaseService, DetailedResponse, ServiceBuilder, ServiceInfo};
use futures_util::Stream;
use reqwest::Method;
use serde_json::{Map, Value, json};

pub const SERVICE: ServiceInfo = ServiceInfo {
    name: "conversation",
    version: "V2",
    default_url: "https://api.us-south.assistant.watson.cloud.ibm.com",
};

/// Optional arguments of the message operations.
#[derive(Debug, Clone, Default)]
pub struct MessageOptions {
    pub input: Option<MessageInput>,
    /// Conversation context. Required on every turn of a stateless
    /// conversation after the first.
    pub context: Option<Value>,
    pub user_id: Option<String>,
}

impl MessageOptions {
    fn to_json(&self) -> Result<Value, WatsonError> {
        let mut body = Map::new();
        if let Some(input) = &self.input {
            body.insert("input".to_string(), serde_json::to_value(input)?);
        }
        if let Some(context) = &self.context {
            body.insert("context".to_string(), context.clone());
        }
        if let Some(user_id) = &self.user_id {
            body.insert("user_id".to_string(), json!(user_id));
        }
        Ok(Value::Object(body))
    }
}

#[derive(Debug, Clone)]
pub struct AssistantV2 {
    base: BaseService,
    version: String,
}

impl_watson_service!(AssistantV2);

impl AssistantV2 {
    /// Creates a client for API version `version` (e.g. `2021-06-14`).
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

    /// Reads credentials from `CONVERSATION_*` environment variables.
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

    pub async fn create_session(
        &self,
        assistant_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("assistant_id", assistant_id)?;
        let request = self
            .request(
                Method::POST,
                format!("{}/sessions", assistant_path(assistant_id)),
            )
            .with_overrides(headers);
        self.base.send_json("create_session", request).await
    }

    pub async fn delete_session(
        &self,
        assistant_id: &str,
        session_id: &str,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("assistant_id", assistant_id)?;
        require("session_id", session_id)?;
        let request = self
            .request(Method::DELETE, session_path(assistant_id, session_id))
            .with_overrides(headers);
        self.base.send_json("delete_session", request).await
    }

    /// Sends user input within a session.
    pub async fn message(
        &self,
        assistant_id: &str,
        session_id: &str,
        options: &MessageOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("assistant_id", assistant_id)?;
        require("session_id", session_id)?;
        let request = self
            .request(
                Method::POST,
                format!("{}/message", session_path(assistant_id, session_id)),
            )
            .json(options.to_json()?)
            .with_overrides(headers);
        self.base.send_json("message", request).await
    }

    /// Sends user input without a session; the caller carries the context.
    pub async fn message_stateless(
        &self,
        assistant_id: &str,
        options: &MessageOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        require("assistant_id", assistant_id)?;
        let request = self
            .request(
                Method::POST,
                format!("{}/message", assistant_path(assistant_id)),
            )
            .json(options.to_json()?)
            .with_overrides(headers);
        self.base.send_json("message_stateless", request).await
    }

    /// Sends user input within a session and streams the response.
    ///
    /// Arguments are validated immediately; the request is sent when the
    /// returned stream is first polled. Each item is one decoded event
    /// (`partial_item`, `complete_item` or `final_response` payloads).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use futures_util::StreamExt;
    /// use ibm_watson::{AssistantV2, BearerTokenAuthenticator, MessageInput, MessageOptions};
    ///
    /// # async fn run() -> Result<(), ibm_watson::WatsonError> {
    /// let assistant = AssistantV2::new("2021-06-14", BearerTokenAuthenticator::new("token")?)?;
    /// let options = MessageOptions {
    ///     input: Some(MessageInput::text("Hello")),
    ///     ..Default::default()
    /// };
    /// let stream = assistant.message_stream("assistant-id", "session-id", &options, None)?;
    /// futures_util::pin_mut!(stream);
    /// while let Some(event) = stream.next().await {
    ///     let event = event?;
    ///     println!("{}: {}", event.event, event.data);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn message_stream<'a>(
        &'a self,
        assistant_id: &str,
        session_id: &str,
        options: &MessageOptions,
        headers: Option<&HeaderOverrides>,
    ) -> Result<impl Stream<Item = Result<SseEvent, WatsonError>> + Send + use<'a>, WatsonError>
    {
        require("assistant_id", assistant_id)?;
        require("session_id", session_id)?;
        let request = self
            .request(
                Method::POST,
                format!("{}/message_stream", session_path(assistant_id, session_id)),
            )
            .json(options.to_json()?)
            .with_overrides(headers);
        Ok(self.base.send_stream("message_stream", request))
    }
}

fn assistant_path(assistant_id: &str) -> String {
    format!("/v2/assistants/{}", encode_segment(assistant_id))
}

fn session_path(assistant_id: &str, session_id: &str) -> String {
    format!(
        "{}/sessions/{}",
        assistant_path(assistant_id),
        encode_segment(session_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_options_omit_unset() {
        assert_eq!(MessageOptions::default().to_json().unwrap(), json!({}));

        let options = MessageOptions {
            input: Some(MessageInput::text("Hi")),
            context: None,
            user_id: Some("u1".to_string()),
        };
        assert_eq!(
            options.to_json().unwrap(),
            json!({"input": {"text": "Hi"}, "user_id": "u1"})
        );
    }

    #[test]
    fn test_message_stream_validates_before_io() {
        let assistant =
            AssistantV2::new("2021-06-14", crate::auth::NoAuthAuthenticator).unwrap();
        let result = assistant.message_stream("", "session", &MessageOptions::default(), None);
        assert!(matches!(
            result,
            Err(WatsonError::InvalidArgument(msg)) if msg.contains("assistant_id")
        ));
    }
}
