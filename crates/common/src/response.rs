use serde_json::Value;

use crate::headers::HeaderMap;

/// Canonical outbound response. Handlers produce one; host adapters project
/// it into their platform's native reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl ApiResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// JSON body response. Serializing a `Value` cannot fail.
    pub fn json(status: u16, value: &Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json");
        Self {
            status,
            headers,
            body: Some(serde_json::to_vec(value).unwrap_or_default()),
        }
    }

    pub fn no_content() -> Self {
        Self::new(204)
    }

    /// Uniform error body: `{"error": message}`.
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, &serde_json::json!({ "error": message }))
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Parse the body back into JSON, mostly for adapters and tests.
    pub fn body_json(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
    }
}
