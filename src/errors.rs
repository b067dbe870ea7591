use thiserror::Error;

/// Defines errors that can occur when calling a Watson service.
///
/// # Example: Handling API Errors
///
/// ```ignore
/// match translator.translate(params).await {
///     Err(WatsonError::Api { status_code: 404, transaction_id, .. }) => {
///         tracing::warn!("Model not found, transaction: {:?}", transaction_id);
///     }
///     Err(WatsonError::Api { status_code, message, .. }) => {
///         tracing::error!("API error {}: {}", status_code, message);
///     }
///     // ...
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WatsonError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("SSE parsing error: {0}")]
    Parse(String),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The service answered with a non-2xx status.
    ///
    /// The message is extracted best-effort from the JSON error body; the
    /// transaction ID comes from the `X-Global-Transaction-Id` header and is
    /// what IBM support asks for when correlating a failed call.
    #[error("API error (HTTP {status_code}): {message}")]
    Api {
        /// HTTP status code (e.g., 400, 404, 500)
        status_code: u16,
        /// Error message from the response body
        message: String,
        /// Value of `X-Global-Transaction-Id`, if present
        transaction_id: Option<String>,
    },
    /// A required call argument was missing or empty.
    ///
    /// Raised before any request is sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Strict model conversion failed: a required field was absent or an
    /// undeclared field was present.
    #[error("Model validation failed: {0}")]
    Validation(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    /// Failed to build the HTTP client.
    ///
    /// This typically only occurs in exceptional circumstances such as
    /// TLS backend initialization failures.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl WatsonError {
    /// Returns the HTTP status code if this is an API error.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            WatsonError::Api { status_code, .. } => Some(*status_code),
            WatsonError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the failure was caused by the caller rather than the
    /// service or the network.
    ///
    /// Covers 4xx API errors, invalid arguments, and model validation
    /// failures. The library never retries on its own; this helper exists so
    /// callers can decide.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            WatsonError::Api { status_code, .. } => (400..500).contains(status_code),
            WatsonError::InvalidArgument(_) | WatsonError::Validation(_) => true,
            _ => false,
        }
    }
}
