//! Stub rules and request patterns.
//!
//! A [`StubRule`] describes one canned exchange: the request the mock server
//! should recognise and the [`ResponseSpec`] it answers with. A
//! [`RequestPattern`] is the verification side of the same rule, used to
//! count what the server actually received.

use std::fmt;

use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, Method};
use serde_json::Value;
use wiremock::matchers::{body_json, header};
use wiremock::{Mock, Request, ResponseTemplate};

/// Media type every stubbed endpoint exchanges.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The response half of a stub.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    /// Status code to answer with.
    pub status: u16,
    /// Extra response headers.
    pub headers: Vec<(HeaderName, HeaderValue)>,
    /// Response body, sent verbatim.
    pub body: Option<String>,
    /// Content type of `body`.
    pub content_type: Option<String>,
}

impl ResponseSpec {
    /// An empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
            content_type: None,
        }
    }

    /// A JSON response carrying `body` verbatim.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            content_type: Some(JSON_CONTENT_TYPE.to_string()),
            ..Self::new(status)
        }
    }

    /// Adds a response header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    fn into_template(self) -> ResponseTemplate {
        let mut template = ResponseTemplate::new(self.status);

        template = match (self.body, self.content_type) {
            (Some(body), Some(content_type)) => template.set_body_raw(body, &content_type),
            (Some(body), None) => template.set_body_string(body),
            (None, Some(content_type)) => {
                template.insert_header(CONTENT_TYPE, content_type.as_str())
            }
            (None, None) => template,
        };

        for (name, value) in self.headers {
            template = template.insert_header(name, value);
        }

        template
    }
}

/// A rule telling the mock server how to answer a matching request.
///
/// # Example
///
/// ```rust
/// use crud_harness::stub::{ResponseSpec, StubRule};
///
/// let rule = StubRule::post("/api/users")
///     .with_json_content_type()
///     .respond_with(ResponseSpec::json(201, r#"{"id":2}"#));
///
/// assert_eq!(rule.pattern().to_string(), "POST /api/users");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StubRule {
    method: Method,
    path: String,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Option<Value>,
    response: ResponseSpec,
}

impl StubRule {
    /// Creates a rule answering `200` with no body until
    /// [`respond_with`](Self::respond_with) says otherwise.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            response: ResponseSpec::new(200),
        }
    }

    /// A `GET` rule for `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A `POST` rule for `path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A `PUT` rule for `path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A `DELETE` rule for `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Requires a request header with exactly this value.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Requires `Content-Type: application/json`.
    pub fn with_json_content_type(self) -> Self {
        self.with_header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
    }

    /// Requires the request body to equal `body` as JSON.
    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the response.
    pub fn respond_with(mut self, response: ResponseSpec) -> Self {
        self.response = response;
        self
    }

    /// Method the rule answers.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path (and query, if any) the rule answers.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Response sent for matching requests.
    pub fn response(&self) -> &ResponseSpec {
        &self.response
    }

    /// The verification pattern matching requests this rule answers.
    pub fn pattern(&self) -> RequestPattern {
        RequestPattern::new(self.method.clone(), self.path.clone())
    }

    /// Converts the rule into a mountable [`Mock`].
    ///
    /// Method and path are matched with the rule's own [`RequestPattern`], so
    /// the mock answers exactly the requests verification counts for it. A
    /// query string the rule does not name makes the request unmatched.
    pub fn into_mock(self) -> Mock {
        let pattern = self.pattern();
        let label = pattern.to_string();
        let mut builder = Mock::given(move |request: &Request| pattern.matches_request(request));

        for (name, value) in self.headers {
            builder = builder.and(header(name, value));
        }
        if let Some(body) = self.body {
            builder = builder.and(body_json(body));
        }

        builder
            .respond_with(self.response.into_template())
            .named(label)
    }
}

/// Method plus exact path (and query, if any) of a request to count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestPattern {
    method: Method,
    path: String,
}

impl RequestPattern {
    /// Pattern for `method` on `path`. A query string, if wanted, is part of
    /// `path`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Method to count.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path and query to count.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true if a request with this method and path-and-query matches.
    pub fn matches(&self, method: &Method, path_and_query: &str) -> bool {
        &self.method == method && self.path == path_and_query
    }

    /// Returns true if a request recorded by the mock server matches.
    pub fn matches_request(&self, request: &Request) -> bool {
        let url = &request.url;
        match url.query() {
            Some(query) => self.matches(&request.method, &format!("{}?{}", url.path(), query)),
            None => self.matches(&request.method, url.path()),
        }
    }
}

impl fmt::Display for RequestPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
