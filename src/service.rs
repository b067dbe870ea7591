//! The shared transport behind every Watson façade.
//!
//! [`BaseService`] owns the HTTP client, the service URL, default headers,
//! the authenticator and the SDK user agent. Façades build a
//! [`WatsonRequest`] and call one of the `send_*` methods; each call issues
//! exactly one HTTP request.
//!
//! Headers are merged in this order, later entries winning:
//!
//! 1. the service's default headers ([`WatsonService::set_default_headers`])
//! 2. `User-Agent` and `X-IBMCloud-SDK-Analytics`
//! 3. headers set by the façade method, then the caller's per-call overrides
//! 4. the `Authorization` header from the authenticator

use crate::auth::Authenticator;
use crate::config::{SdkInfo, ServiceCredentials};
use crate::errors::WatsonError;
use crate::http::common::{
    Operation, SDK_ANALYTICS_HEADER, TRANSACTION_ID_HEADER, join_url, normalize_service_url,
};
use crate::http::error_helpers::{check_response, deserialize_with_context};
use crate::http::loud_wire;
use crate::http::sse_parser::{SseEvent, parse_sse_stream};
use crate::models::Model;
use crate::request::{FormPart, HeaderOverrides, RequestBody, WatsonRequest};
use async_stream::try_stream;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Static description of a Watson service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceInfo {
    /// snake_case name, used for analytics and `<NAME>_*` env variables
    pub name: &'static str,
    /// API major version as reported in analytics (`V1`, `V3`, ...)
    pub version: &'static str,
    pub default_url: &'static str,
}

/// A response with its status, headers and decoded body.
#[derive(Debug, Clone)]
pub struct DetailedResponse<T> {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub result: T,
}

impl<T> DetailedResponse<T> {
    /// Returns the `X-Global-Transaction-Id` header, if present.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.headers
            .get(TRANSACTION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn into_result(self) -> T {
        self.result
    }
}

impl DetailedResponse<Value> {
    /// Converts the JSON result into a typed model with strict validation.
    ///
    /// # Errors
    ///
    /// Returns [`WatsonError::Validation`] if a required field is missing or
    /// an undeclared field is present.
    pub fn into_model<M: Model>(self) -> Result<M, WatsonError> {
        M::from_dict(self.result)
    }
}

/// Common configuration surface of all façades.
pub trait WatsonService {
    fn base(&self) -> &BaseService;
    fn base_mut(&mut self) -> &mut BaseService;

    /// Points the façade at a different endpoint (another region, a
    /// private endpoint or a test server).
    fn set_service_url(&mut self, service_url: &str) {
        self.base_mut().set_service_url(service_url);
    }

    /// Replaces the headers sent with every request.
    fn set_default_headers(&mut self, headers: HeaderOverrides) {
        self.base_mut().set_default_headers(headers);
    }

    fn service_url(&self) -> &str {
        self.base().service_url()
    }
}

/// Builder for [`BaseService`] instances.
///
/// # Example
///
/// ```
/// use ibm_watson::{BasicAuthenticator, ServiceBuilder, LanguageTranslatorV3};
/// use std::time::Duration;
///
/// # fn main() -> Result<(), ibm_watson::WatsonError> {
/// let builder = ServiceBuilder::new(BasicAuthenticator::new("apikey", "secret")?)
///     .service_url("https://api.eu-de.language-translator.watson.cloud.ibm.com")
///     .timeout(Duration::from_secs(60));
/// let translator = LanguageTranslatorV3::with_builder("2018-05-01", builder)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ServiceBuilder {
    authenticator: Arc<dyn Authenticator>,
    service_url: Option<String>,
    default_headers: HeaderOverrides,
    sdk_info: SdkInfo,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    disable_ssl_verification: bool,
    http_client: Option<ReqwestClient>,
}

impl ServiceBuilder {
    pub fn new(authenticator: impl Authenticator + 'static) -> Self {
        Self::with_shared_authenticator(Arc::new(authenticator))
    }

    /// Uses an authenticator shared with other façades.
    pub fn with_shared_authenticator(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            service_url: None,
            default_headers: HeaderOverrides::new(),
            sdk_info: SdkInfo::new(),
            timeout: None,
            connect_timeout: None,
            disable_ssl_verification: false,
            http_client: None,
        }
    }

    /// Configures authenticator and URL from `<NAME>_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`WatsonError::Auth`] if no credentials are configured for the
    /// service or they are invalid.
    pub fn from_env(info: &ServiceInfo) -> Result<Self, WatsonError> {
        Self::from_credentials(info, &ServiceCredentials::from_env(info.name))
    }

    /// Like [`from_env`](Self::from_env), from already loaded credentials.
    pub fn from_credentials(
        info: &ServiceInfo,
        credentials: &ServiceCredentials,
    ) -> Result<Self, WatsonError> {
        let authenticator = credentials.authenticator()?.ok_or_else(|| {
            WatsonError::Auth(format!(
                "no credentials found for service '{}'",
                info.name
            ))
        })?;
        let mut builder = Self::with_shared_authenticator(Arc::from(authenticator));
        builder.service_url = credentials.url.clone();
        Ok(builder)
    }

    #[must_use]
    pub fn service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn default_headers(mut self, headers: HeaderOverrides) -> Self {
        self.default_headers = headers;
        self
    }

    #[must_use]
    pub fn sdk_info(mut self, sdk_info: SdkInfo) -> Self {
        self.sdk_info = sdk_info;
        self
    }

    /// Sets the total request timeout.
    ///
    /// For streaming calls this bounds the whole stream, not each event.
    /// If not set, uses reqwest's default (no timeout).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Accepts invalid TLS certificates. Only for private deployments with
    /// self-signed certificates.
    #[must_use]
    pub const fn disable_ssl_verification(mut self, disable: bool) -> Self {
        self.disable_ssl_verification = disable;
        self
    }

    /// Uses a preconfigured HTTP client. Timeouts and SSL settings on this
    /// builder are then ignored.
    #[must_use]
    pub fn http_client(mut self, client: ReqwestClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the transport for `info`.
    ///
    /// # Errors
    ///
    /// Returns an error if the authenticator configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn build(self, info: &ServiceInfo) -> Result<BaseService, WatsonError> {
        self.authenticator.validate()?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = ReqwestClient::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(connect_timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(connect_timeout);
                }
                if self.disable_ssl_verification {
                    builder = builder.danger_accept_invalid_certs(true);
                }
                builder
                    .build()
                    .map_err(|e| WatsonError::ClientBuild(e.to_string()))?
            }
        };

        let service_url = self
            .service_url
            .as_deref()
            .map_or_else(|| info.default_url.to_string(), normalize_service_url);

        tracing::debug!(
            "Configured {} {} at {} ({} auth)",
            info.name,
            info.version,
            service_url,
            self.authenticator.authentication_type()
        );

        Ok(BaseService {
            info: *info,
            service_url,
            default_headers: self.default_headers,
            authenticator: self.authenticator,
            sdk_info: self.sdk_info,
            http_client,
        })
    }
}

/// Shared HTTP transport for one service.
#[derive(Debug, Clone)]
pub struct BaseService {
    info: ServiceInfo,
    service_url: String,
    default_headers: HeaderOverrides,
    authenticator: Arc<dyn Authenticator>,
    sdk_info: SdkInfo,
    #[allow(clippy::struct_field_names)]
    http_client: ReqwestClient,
}

impl BaseService {
    #[must_use]
    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }

    #[must_use]
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn set_service_url(&mut self, service_url: &str) {
        self.service_url = normalize_service_url(service_url);
    }

    #[must_use]
    pub fn default_headers(&self) -> &HeaderOverrides {
        &self.default_headers
    }

    pub fn set_default_headers(&mut self, headers: HeaderOverrides) {
        self.default_headers = headers;
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.sdk_info.user_agent()
    }

    /// Merges default, SDK, request and override headers, then
    /// authenticates. See the module docs for precedence.
    pub async fn prepare_headers(
        &self,
        operation_id: &str,
        request: &WatsonRequest,
    ) -> Result<HeaderMap, WatsonError> {
        let mut headers = HeaderMap::new();

        let mut defaults: Vec<_> = self.default_headers.iter().collect();
        defaults.sort();
        for (name, value) in defaults {
            insert_header(&mut headers, name, value)?;
        }

        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(self.sdk_info.user_agent())
                .map_err(|e| WatsonError::InvalidArgument(format!("invalid user agent: {e}")))?,
        );
        let operation = Operation {
            service_name: self.info.name,
            service_version: self.info.version,
            operation_id,
        };
        insert_header(&mut headers, SDK_ANALYTICS_HEADER, &operation.analytics_header())?;

        for (name, value) in &request.headers {
            insert_header(&mut headers, name, value)?;
        }

        self.authenticator.authenticate(&mut headers).await?;
        Ok(headers)
    }

    /// Sends `request` and returns the successful response.
    async fn execute(
        &self,
        operation_id: &str,
        request: WatsonRequest,
    ) -> Result<(Response, usize), WatsonError> {
        let url = join_url(&self.service_url, &request.path);
        let headers = self.prepare_headers(operation_id, &request).await?;

        let request_id = loud_wire::next_request_id();
        tracing::debug!(
            "{}.{}: {} {} ({} query params)",
            self.info.name,
            operation_id,
            request.method,
            url,
            request.query.len()
        );

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .query(&request.query);

        let full_url = if request.query.is_empty() {
            url.clone()
        } else {
            let query = request
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            format!("{url}?{query}")
        };

        match request.body {
            RequestBody::Empty => {
                loud_wire::log_request(request_id, request.method.as_str(), &full_url, None);
                builder = builder.headers(headers);
            }
            RequestBody::Json(body) => {
                let rendered = serde_json::to_string(&body).ok();
                loud_wire::log_request(
                    request_id,
                    request.method.as_str(),
                    &full_url,
                    rendered.as_deref(),
                );
                builder = builder.headers(headers).json(&body);
            }
            RequestBody::Raw { content_type, data } => {
                let mut headers = headers;
                if !headers.contains_key(CONTENT_TYPE) {
                    insert_header(&mut headers, CONTENT_TYPE.as_str(), &content_type)?;
                }
                let preview = std::str::from_utf8(&data).ok();
                loud_wire::log_request(request_id, request.method.as_str(), &full_url, preview);
                builder = builder.headers(headers).body(data);
            }
            RequestBody::Form(pairs) => {
                loud_wire::log_request(request_id, request.method.as_str(), &full_url, None);
                builder = builder.headers(headers).form(&pairs);
            }
            RequestBody::Multipart(parts) => {
                let names: Vec<&str> = parts.iter().map(FormPart::name).collect();
                loud_wire::log_request(request_id, request.method.as_str(), &full_url, None);
                loud_wire::log_multipart(request_id, &names);
                let form = build_form(parts)?;
                builder = builder.headers(headers).multipart(form);
            }
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        loud_wire::log_response_status(request_id, status);
        tracing::debug!("{}.{}: HTTP {}", self.info.name, operation_id, status);

        let response = check_response(response).await?;
        Ok((response, request_id))
    }

    /// Sends a request whose response body is JSON. An empty body decodes
    /// to `Value::Null`.
    pub async fn send_json(
        &self,
        operation_id: &str,
        request: WatsonRequest,
    ) -> Result<DetailedResponse<Value>, WatsonError> {
        let (response, request_id) = self.execute(operation_id, request).await?;
        let status_code = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response.text().await?;
        loud_wire::log_response_body(request_id, &text);

        let result = if text.trim().is_empty() {
            Value::Null
        } else {
            deserialize_with_context(&text, operation_id)?
        };

        Ok(DetailedResponse {
            status_code,
            headers,
            result,
        })
    }

    /// Sends a request whose response body is binary (audio, documents,
    /// Core ML models).
    pub async fn send_bytes(
        &self,
        operation_id: &str,
        request: WatsonRequest,
    ) -> Result<DetailedResponse<Bytes>, WatsonError> {
        let (response, request_id) = self.execute(operation_id, request).await?;
        let status_code = response.status().as_u16();
        let headers = response.headers().clone();
        let result = response.bytes().await?;
        loud_wire::log_response_bytes(
            request_id,
            headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            result.len(),
        );

        Ok(DetailedResponse {
            status_code,
            headers,
            result,
        })
    }

    /// Sends a request whose response body is text (e.g. CSV).
    pub async fn send_text(
        &self,
        operation_id: &str,
        request: WatsonRequest,
    ) -> Result<DetailedResponse<String>, WatsonError> {
        let (response, request_id) = self.execute(operation_id, request).await?;
        let status_code = response.status().as_u16();
        let headers = response.headers().clone();
        let result = response.text().await?;
        loud_wire::log_response_body(request_id, &result);

        Ok(DetailedResponse {
            status_code,
            headers,
            result,
        })
    }

    /// Sends a request and decodes its body as Server-Sent Events.
    ///
    /// Nothing is sent until the stream is first polled. The stream reads
    /// further from the body only as events are pulled; dropping it closes
    /// the connection.
    pub fn send_stream<'a>(
        &'a self,
        operation_id: &'a str,
        request: WatsonRequest,
    ) -> impl Stream<Item = Result<SseEvent, WatsonError>> + Send + 'a {
        let request = request.header_value(ACCEPT.as_str(), "text/event-stream");
        try_stream! {
            let (response, request_id) = self.execute(operation_id, request).await?;
            let events = parse_sse_stream(response.bytes_stream(), request_id);
            futures_util::pin_mut!(events);

            while let Some(event) = events.next().await {
                let event = event?;
                tracing::debug!("{}.{}: SSE event '{}'", self.info.name, operation_id, event.event);
                yield event;
            }
        }
    }
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), WatsonError> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| WatsonError::InvalidArgument(format!("invalid header name '{name}': {e}")))?;
    let value = HeaderValue::from_str(value).map_err(|e| {
        WatsonError::InvalidArgument(format!("invalid value for header '{name}': {e}"))
    })?;
    headers.insert(name, value);
    Ok(())
}

fn build_form(parts: Vec<FormPart>) -> Result<Form, WatsonError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File { name, file } => {
                let mut part = Part::bytes(file.data.to_vec());
                if let Some(filename) = file.filename {
                    part = part.file_name(filename);
                }
                if let Some(content_type) = file.content_type {
                    part = part.mime_str(&content_type).map_err(|e| {
                        WatsonError::InvalidArgument(format!(
                            "invalid content type '{content_type}' for part '{name}': {e}"
                        ))
                    })?;
                }
                form.part(name, part)
            }
        };
    }
    Ok(form)
}
