//! Wire-level debugging via the `WATSON_LOUD_WIRE` environment variable.
//!
//! When `WATSON_LOUD_WIRE` is set to any value, requests, responses and
//! decoded SSE events are printed to stderr with pretty, colored JSON.
//!
//! # Usage
//!
//! ```bash
//! WATSON_LOUD_WIRE=1 cargo test --test assistant_tests
//! ```
//!
//! # Output Format
//!
//! - Green `>>>` for outgoing requests
//! - Red `<<<` for incoming responses
//! - Blue for SSE events
//! - Timestamps and request IDs for correlation
//!
//! Base64-looking fields (`data`, `image`, `audio`) are truncated so image
//! uploads stay readable.

use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Request ID counter for correlating requests with responses
static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Cached check for whether wire logging is enabled
static ENABLED: OnceLock<bool> = OnceLock::new();

const ENV_VAR: &str = "WATSON_LOUD_WIRE";

/// Check if wire logging is enabled.
///
/// Cached after the first check: the variable must be set before the first
/// request is sent.
#[must_use]
pub fn is_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var(ENV_VAR).is_ok())
}

/// Get the next request ID for correlation.
#[must_use]
pub fn next_request_id() -> usize {
    REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed)
}

const TRUNCATE_FIELDS: &[&str] = &["data", "image", "audio"];

/// Maximum length before truncation (keep first 100 chars).
const TRUNCATE_THRESHOLD: usize = 100;

/// Truncates long string values of [`TRUNCATE_FIELDS`] anywhere in `value`.
fn truncate_long_fields(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if TRUNCATE_FIELDS.contains(&key.as_str()) {
                    if let serde_json::Value::String(s) = val
                        && s.len() > TRUNCATE_THRESHOLD
                        && s.is_char_boundary(TRUNCATE_THRESHOLD)
                    {
                        *s = format!("{}...", &s[..TRUNCATE_THRESHOLD]);
                    }
                } else {
                    truncate_long_fields(val);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                truncate_long_fields(item);
            }
        }
        _ => {}
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn prefix(request_id: usize) -> String {
    format!(
        "{} {} {}",
        "[LOUD_WIRE]".bold(),
        timestamp().dimmed(),
        format!("[REQ#{}]", request_id).cyan()
    )
}

fn print_json(prefix: &str, value: &serde_json::Value) {
    let mut value = value.clone();
    truncate_long_fields(&mut value);
    let rendered = colored_json::to_colored_json_auto(&value)
        .ok()
        .or_else(|| serde_json::to_string_pretty(&value).ok());
    if let Some(rendered) = rendered {
        for line in rendered.lines() {
            eprintln!("{prefix} {line}");
        }
    }
}

fn print_body(prefix: &str, label: &str, body: &str, limit: usize) {
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) {
        eprintln!("{prefix} {label}:");
        print_json(prefix, &parsed);
    } else {
        let truncated = super::error_helpers::truncate_for_context(body, limit);
        eprintln!("{prefix} {label}: {truncated}");
    }
}

/// Log an outgoing HTTP request.
pub fn log_request(request_id: usize, method: &str, url: &str, body: Option<&str>) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    eprintln!("{prefix} {} {method} {url}", ">>>".green().bold());

    if let Some(body) = body {
        print_body(&prefix, &"Body".green().to_string(), body, 500);
    }
}

/// Log the names of a multipart request's parts.
pub fn log_multipart(request_id: usize, part_names: &[&str]) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    eprintln!(
        "{prefix} {}: {}",
        "Multipart".green(),
        part_names.join(", ")
    );
}

/// Log an incoming HTTP response status.
pub fn log_response_status(request_id: usize, status: u16) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let status_text = if status < 300 {
        format!("{status} OK").green()
    } else {
        format!("{status} ERROR").red()
    };

    eprintln!("{prefix} {} {status_text}", "<<<".red().bold());
}

/// Log an incoming HTTP response body.
pub fn log_response_body(request_id: usize, body: &str) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    print_body(&prefix, &"Response".red().to_string(), body, 1000);
}

/// Log a binary response by size only.
pub fn log_response_bytes(request_id: usize, content_type: Option<&str>, len: usize) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    eprintln!(
        "{prefix} {}: <{len} bytes, {}>",
        "Response".red(),
        content_type.unwrap_or("unknown content type")
    );
}

/// Log a decoded SSE event.
pub fn log_sse_event(request_id: usize, event: &str, data: &serde_json::Value) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    eprintln!("{prefix} {} {event}:", "SSE".blue().bold());
    print_json(&prefix, data);
}
