//! Extracting a human-readable message from an error response body.
//!
//! Update failures come back in several shapes depending on which layer
//! rejected the request: a JSON object from the API itself, an HTML error
//! page from a proxy or framework, or bare text.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::StatusCode;
use serde_json::Value;

static PRE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?is)<pre[^>]*>([^<]+)</pre>").expect("static regex is valid")
});

/// Best-effort message for a failed response.
///
/// Tried in order: a JSON `error` or `message` field, the text of the first
/// `<pre>` block, a generic note for other HTML pages, the raw trimmed body.
/// An empty or unhelpful body yields `HTTP <code>: <reason>`.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
  let reason = status.canonical_reason().unwrap_or("Unknown");
  let fallback = format!("HTTP {}: {reason}", status.as_u16());
  let body = body.trim();

  if body.is_empty() {
    return fallback;
  }

  if let Ok(value) = serde_json::from_str::<Value>(body) {
    return json_message(&value).unwrap_or(fallback);
  }

  if let Some(text) = PRE_BLOCK
    .captures(body)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().trim())
    .filter(|t| !t.is_empty())
  {
    return text.to_owned();
  }

  if looks_like_html(body) {
    return format!("Server returned HTML error page: {} {reason}", status.as_u16());
  }

  body.to_owned()
}

fn json_message(value: &Value) -> Option<String> {
  ["error", "message"]
    .iter()
    .filter_map(|key| value.get(key).and_then(Value::as_str))
    .map(str::trim)
    .find(|m| !m.is_empty())
    .map(str::to_owned)
}

fn looks_like_html(body: &str) -> bool {
  let head: String = body.chars().take(15).collect::<String>().to_ascii_lowercase();
  head.starts_with("<!doctype") || head.starts_with("<html")
}
