//! Spider API response handling.

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde_json::Value;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum SpiderResponse {
    /// Records from a JSONL stream, in arrival order.
    Records(Vec<Value>),
    /// A single JSON document.
    Document(Value),
}

impl SpiderResponse {
    /// Collapse into one JSON value; records become an array.
    pub fn into_value(self) -> Value {
        match self {
            SpiderResponse::Records(records) => Value::Array(records),
            SpiderResponse::Document(doc) => doc,
        }
    }

    /// Number of records, counting a document array element-wise.
    pub fn record_count(&self) -> usize {
        match self {
            SpiderResponse::Records(records) => records.len(),
            SpiderResponse::Document(Value::Array(items)) => items.len(),
            SpiderResponse::Document(Value::Null) => 0,
            SpiderResponse::Document(_) => 1,
        }
    }

    pub fn is_streamed(&self) -> bool {
        matches!(self, SpiderResponse::Records(_))
    }
}

/// Whether the response headers announce a line-delimited body.
pub fn is_line_delimited(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("jsonl") || ct.contains("ndjson")
        })
        .unwrap_or(false)
}

/// Cap error bodies so a large HTML error page does not flood the tool output.
pub(crate) fn truncate_body(body: &str, max_chars: usize) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
