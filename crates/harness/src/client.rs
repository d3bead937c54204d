//! HTTP client used by scenarios to drive the mock server.

use std::time::Duration;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{AssertionError, HarnessError, HarnessResult};
use crate::stub::JSON_CONTENT_TYPE;

/// A single outgoing request, relative to the client's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
    pub content_type: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            content_type: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Declares the request as JSON without attaching a body.
    pub fn json_content_type(mut self) -> Self {
        self.content_type = Some(JSON_CONTENT_TYPE.to_string());
        self
    }

    /// Attaches a raw JSON body and the matching content type.
    pub fn json_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.json_content_type()
    }

    /// Attaches a raw body without declaring a content type.
    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A received response, fully buffered.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    /// The numeric status code.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Parses the `Content-Type` header, if present and well-formed.
    pub fn content_type(&self) -> Option<mime::Mime> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }

    /// Returns true if the response declares a JSON body.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|m| m.type_() == mime::APPLICATION && m.subtype() == mime::JSON)
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Result<Value, AssertionError> {
        serde_json::from_str(&self.body).map_err(|source| AssertionError::NotJson { source })
    }
}

/// Client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for `base_url` with the given request timeout.
    pub fn new(base_url: Url, timeout: Duration) -> HarnessResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base URL.
    pub fn url_for(&self, path: &str) -> HarnessResult<Url> {
        self.base_url.join(path).map_err(|source| HarnessError::Url {
            path: path.to_string(),
            source,
        })
    }

    /// Sends a request and buffers the response.
    pub async fn send(&self, request: ApiRequest) -> HarnessResult<ApiResponse> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self.http.request(request.method, url);
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "Received response");

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde_json::json;

    fn response(content_type: Option<&'static str>, body: &str) -> ApiResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        ApiResponse {
            status: StatusCode::OK,
            headers,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = ApiRequest::post("/api/users").json_body("{}");
        assert_eq!(request.content_type.as_deref(), Some("application/json"));
        assert_eq!(request.body.as_deref(), Some("{}"));

        let bare = ApiRequest::post("/api/users").raw_body("{}");
        assert!(bare.content_type.is_none());
    }

    #[test]
    fn test_is_json() {
        assert!(response(Some("application/json"), "{}").is_json());
        assert!(response(Some("application/json; charset=utf-8"), "{}").is_json());
        assert!(!response(Some("text/plain"), "{}").is_json());
        assert!(!response(None, "{}").is_json());
    }

    #[test]
    fn test_json_parse() {
        let ok = response(None, r#"{"id": 1}"#);
        assert_eq!(ok.json().unwrap(), json!({"id": 1}));

        let bad = response(None, "<html>");
        assert!(matches!(bad.json(), Err(AssertionError::NotJson { .. })));
    }

    #[test]
    fn test_url_for() {
        let base = Url::parse("http://127.0.0.1:8080").unwrap();
        let client = ApiClient::new(base, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.url_for("/api/users/1").unwrap().as_str(),
            "http://127.0.0.1:8080/api/users/1"
        );
    }
}
