use serde::Serialize;

use crate::headers::HeaderMap;
use crate::method::HttpMethod;
use crate::query::QueryMap;

/// Raw request/response payload plus its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl Body {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self { bytes, content_type }
    }

    pub fn json(bytes: Vec<u8>) -> Self {
        Self::new(bytes, Some("application/json".to_string()))
    }
}

/// Canonical inbound request. Host adapters build one of these from their
/// native event; it is immutable from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    query: QueryMap,
    headers: HeaderMap,
    body: Option<Body>,
}

impl ApiRequest {
    /// Start a builder. `path` may carry a query string (`/services?name=x`),
    /// which is split off and parsed.
    pub fn builder(method: HttpMethod, path: &str) -> ApiRequestBuilder {
        let (path, query) = match path.split_once('?') {
            Some((p, raw)) => (p.to_string(), QueryMap::parse(raw)),
            None => (path.to_string(), QueryMap::new()),
        };
        ApiRequestBuilder {
            method,
            path,
            query,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path split into non-empty segments; a trailing slash is insignificant.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    pub fn query(&self) -> &QueryMap {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }
}

#[derive(Debug)]
pub struct ApiRequestBuilder {
    method: HttpMethod,
    path: String,
    query: QueryMap,
    headers: HeaderMap,
    body: Option<Body>,
}

impl ApiRequestBuilder {
    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.append(key, value);
        self
    }

    /// Parse and merge a raw query string.
    pub fn raw_query(mut self, raw: &str) -> Self {
        for (k, v) in QueryMap::parse(raw).iter() {
            self.query.append(k, v);
        }
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(value)?;
        self.body = Some(Body::json(bytes));
        Ok(self)
    }

    pub fn build(self) -> ApiRequest {
        ApiRequest {
            method: self.method,
            path: self.path,
            query: self.query,
            headers: self.headers,
            body: self.body,
        }
    }
}
