//! Transport-independent description of one Watson REST call.
//!
//! Façades assemble a [`WatsonRequest`] (method, path, query, headers, body)
//! and hand it to one of the `BaseService::send_*` methods. Unset
//! optional values never reach the request: every `*_opt` builder method
//! drops `None`.

use crate::errors::WatsonError;
use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Per-call headers merged over a service's default headers.
pub type HeaderOverrides = HashMap<String, String>;

/// A file to upload as a multipart part.
///
/// The filename and content type are explicit; nothing is inferred from the
/// data itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FileWithMetadata {
    pub data: Bytes,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

impl FileWithMetadata {
    /// Wraps raw bytes with no filename or content type.
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            filename: None,
            content_type: None,
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the content type only if none was given.
    #[must_use]
    pub fn or_content_type(self, content_type: &str) -> Self {
        if self.content_type.is_some() {
            self
        } else {
            self.with_content_type(content_type)
        }
    }

    /// Reads a file from disk. The filename is taken from the path and the
    /// content type guessed from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`WatsonError::Io`] if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, WatsonError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from);
        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(guess_content_type)
            .map(String::from);

        tracing::debug!(
            "Loaded upload file {:?}: {} bytes, content_type={:?}",
            filename,
            data.len(),
            content_type
        );

        Ok(Self {
            data: Bytes::from(data),
            filename,
            content_type,
        })
    }
}

/// Maps common upload extensions to MIME types.
#[must_use]
pub fn guess_content_type(extension: &str) -> Option<&'static str> {
    let content_type = match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "zip" => "application/zip",
        "json" => "application/json",
        "xml" => "application/xml",
        "tmx" => "application/x-tmx+xml",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "html" | "htm" => "text/html",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "odt" => "application/vnd.oasis.opendocument.text",
        "rtf" => "application/rtf",
        "wav" => "audio/wav",
        "mp3" => "audio/mp3",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "webm" => "audio/webm",
        _ => return None,
    };
    Some(content_type)
}

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: FileWithMetadata },
}

impl FormPart {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Request body encodings used across the Watson APIs.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// Raw text or binary content with an explicit content type.
    Raw { content_type: String, data: Bytes },
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    Multipart(Vec<FormPart>),
}

/// A fully described REST call, prior to authentication.
#[derive(Debug, Clone)]
pub struct WatsonRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: RequestBody,
}

impl WatsonRequest {
    /// Starts a request for `path`, relative to the service URL.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    #[must_use]
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Returns the last value set for header `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn query_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Adds a list parameter as one comma-separated value; empty or absent
    /// lists are omitted.
    #[must_use]
    pub fn query_list<S: AsRef<str>>(self, key: &str, values: Option<&[S]>) -> Self {
        match values {
            Some(values) if !values.is_empty() => {
                let joined = values
                    .iter()
                    .map(|v| v.as_ref())
                    .collect::<Vec<_>>()
                    .join(",");
                self.query(key, joined)
            }
            _ => self,
        }
    }

    #[must_use]
    pub fn header_value(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn header_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.header_value(name, v),
            None => self,
        }
    }

    /// Applies per-call header overrides; these win over everything the
    /// façade set itself.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Option<&HeaderOverrides>) -> Self {
        if let Some(overrides) = overrides {
            let mut pairs: Vec<_> = overrides.iter().collect();
            // HashMap order is unspecified; keep the request deterministic.
            pairs.sort();
            for (k, v) in pairs {
                self.headers.push((k.clone(), v.clone()));
            }
        }
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    #[must_use]
    pub fn raw(mut self, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.body = RequestBody::Raw {
            content_type: content_type.into(),
            data: data.into(),
        };
        self
    }

    #[must_use]
    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(pairs);
        self
    }

    #[must_use]
    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }
}

/// Accumulates multipart parts, dropping unset optional ones.
#[derive(Debug, Default)]
pub struct MultipartBuilder {
    parts: Vec<FormPart>,
}

impl MultipartBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &str, value: impl ToString) -> Self {
        self.parts.push(FormPart::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    #[must_use]
    pub fn text_opt<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.text(name, v),
            None => self,
        }
    }

    /// Adds a file part. A part without a filename is sent with `name` as its
    /// filename, which Watson requires for file fields.
    #[must_use]
    pub fn file(mut self, name: &str, file: FileWithMetadata) -> Self {
        let file = if file.filename.is_some() {
            file
        } else {
            file.with_filename(name)
        };
        self.parts.push(FormPart::File {
            name: name.to_string(),
            file,
        });
        self
    }

    #[must_use]
    pub fn file_opt(self, name: &str, file: Option<FileWithMetadata>) -> Self {
        match file {
            Some(f) => self.file(name, f),
            None => self,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[must_use]
    pub fn build(self) -> Vec<FormPart> {
        self.parts
    }
}

/// Fails with [`WatsonError::InvalidArgument`] if `value` is empty.
pub(crate) fn require(name: &str, value: &str) -> Result<(), WatsonError> {
    if value.is_empty() {
        return Err(WatsonError::InvalidArgument(format!(
            "{name} must be provided"
        )));
    }
    Ok(())
}

/// Fails with [`WatsonError::InvalidArgument`] if `values` is empty.
pub(crate) fn require_non_empty<T>(name: &str, values: &[T]) -> Result<(), WatsonError> {
    if values.is_empty() {
        return Err(WatsonError::InvalidArgument(format!(
            "{name} must be provided"
        )));
    }
    Ok(())
}

/// Fails with [`WatsonError::InvalidArgument`] if `file` holds no data.
pub(crate) fn require_file(name: &str, file: &FileWithMetadata) -> Result<(), WatsonError> {
    if file.data.is_empty() {
        return Err(WatsonError::InvalidArgument(format!(
            "{name} must be provided"
        )));
    }
    Ok(())
}
