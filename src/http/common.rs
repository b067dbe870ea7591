/// Header carrying the SDK analytics triple on every request.
pub const SDK_ANALYTICS_HEADER: &str = "X-IBMCloud-SDK-Analytics";

/// Header IBM Cloud uses to correlate a request across its services.
pub const TRANSACTION_ID_HEADER: &str = "X-Global-Transaction-Id";

/// Identifies which façade operation issued a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation<'a> {
    pub service_name: &'a str,
    pub service_version: &'a str,
    pub operation_id: &'a str,
}

impl Operation<'_> {
    /// Value of the [`SDK_ANALYTICS_HEADER`].
    #[must_use]
    pub fn analytics_header(&self) -> String {
        format!(
            "service_name={};service_version={};operation_id={}",
            self.service_name, self.service_version, self.operation_id
        )
    }
}

/// Percent-encodes one path segment (a model, classifier or session ID).
#[must_use]
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Joins a service URL and a request path with exactly one slash between
/// them.
#[must_use]
pub fn join_url(service_url: &str, path: &str) -> String {
    let base = service_url.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Normalizes a user-supplied service URL: trailing slashes are dropped.
#[must_use]
pub fn normalize_service_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
