//! Request and response types shared by the router and handlers.

use crate::error::MockError;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderName, AUTHORIZATION, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::collections::HashMap;

pub type MockResponse = Response<Full<Bytes>>;

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorDetail>,
}

/// Individual error detail
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
}

/// A fully buffered API request
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl MockRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            authorization: None,
            content_type: None,
            body: Bytes::new(),
        }
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = parse_query_string(query);
        self
    }

    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    pub fn with_body(mut self, content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.content_type = Some(content_type.into());
        self.body = body.into();
        self
    }

    /// Buffer an incoming hyper request
    pub async fn from_incoming(req: Request<Incoming>) -> Result<Self, String> {
        let (parts, body) = req.into_parts();
        let header = |name: HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let authorization = header(AUTHORIZATION);
        let content_type = header(CONTENT_TYPE);
        let body = body
            .collect()
            .await
            .map(|c| c.to_bytes())
            .map_err(|e| format!("Failed to read request body: {e}"))?;

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts
                .uri
                .query()
                .map(parse_query_string)
                .unwrap_or_default(),
            authorization,
            content_type,
            body,
        })
    }

    pub fn has_content_type(&self, expected: &str) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains(expected))
    }

    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Parse a query string into decoded key/value pairs.
///
/// A repeated key keeps its first value.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    // Forms encode spaces as '+'
    let decode = |s: &str| {
        urlencoding::decode(&s.replace('+', " "))
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| s.to_string())
    };

    let mut params = HashMap::new();
    for pair in query.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.entry(decode(key)).or_insert_with(|| decode(value));
    }
    params
}

// =============================================================================
// Response helper functions
// =============================================================================

/// Create a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> MockResponse {
    let json = serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string());
    build_response_with_headers(status, [("Content-Type", "application/json")], json)
}

/// Serve a canned JSON body as-is
pub fn raw_json_response(status: StatusCode, body: impl Into<Bytes>) -> MockResponse {
    build_response_with_headers(status, [("Content-Type", "application/json")], body)
}

/// Build an HTTP response with headers.
///
/// Falls back to a minimal 500 response if the builder rejects a header.
pub fn build_response_with_headers(
    status: StatusCode,
    headers: impl IntoIterator<Item = (impl AsRef<str>, impl AsRef<str>)>,
    body: impl Into<Bytes>,
) -> MockResponse {
    let mut builder = Response::builder().status(status);
    for (key, value) in headers {
        builder = builder.header(key.as_ref(), value.as_ref());
    }
    builder
        .body(Full::new(body.into()))
        .unwrap_or_else(|_| internal_error())
}

/// Create an error response
pub fn error_response(status: StatusCode, message: &str) -> MockResponse {
    let error = ErrorResponse {
        errors: vec![ErrorDetail {
            code: status.as_u16(),
            message: message.to_string(),
        }],
    };
    json_response(status, &error)
}

impl From<&MockError> for ErrorResponse {
    fn from(err: &MockError) -> Self {
        ErrorResponse {
            errors: vec![ErrorDetail {
                code: err.status().as_u16(),
                message: err.to_string(),
            }],
        }
    }
}

fn internal_error() -> MockResponse {
    let mut response = Response::new(Full::new(Bytes::from("Internal Server Error")));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
