use std::collections::HashMap;
use std::fmt;

/// HTTP request methods.
///
/// The common verbs get their own variant. Anything else the client sends is
/// kept verbatim in `Extension` so the request line round-trips into logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any other method token, as received
    Extension(String),
}

/// Represents a parsed HTTP request from a client.
///
/// Built fresh for every request cycle on a connection and dropped once the
/// router has produced a response.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target, not percent-decoded (e.g. "/echo/abc")
    pub path: String,
    /// Protocol token from the request line (typically "HTTP/1.1")
    pub version: String,
    /// Request headers. Names are case-sensitive; the last duplicate wins.
    pub headers: HashMap<String, String>,
    /// Request body. Empty unless a positive Content-Length was fully read.
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Method {
    /// Parses an HTTP method token.
    ///
    /// Known verbs are matched ignoring ASCII case; every other token becomes
    /// [`Method::Extension`].
    ///
    /// # Example
    ///
    /// ```
    /// # use courier::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("post"), Method::POST);
    /// assert_eq!(Method::parse("BREW"), Method::Extension("BREW".into()));
    /// ```
    pub fn parse(s: &str) -> Self {
        const KNOWN: [(&str, Method); 7] = [
            ("GET", Method::GET),
            ("POST", Method::POST),
            ("PUT", Method::PUT),
            ("DELETE", Method::DELETE),
            ("HEAD", Method::HEAD),
            ("OPTIONS", Method::OPTIONS),
            ("PATCH", Method::PATCH),
        ];

        KNOWN
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, method)| method)
            .unwrap_or_else(|| Method::Extension(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Extension(token) => token.as_str(),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Body length declared by a header map, or 0 when `Content-Length` is
/// missing or not a valid number.
pub fn content_length_of(headers: &HashMap<String, String>) -> usize {
    headers
        .get("Content-Length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

impl Request {
    /// Retrieves a header value by its exact (case-sensitive) name.
    ///
    /// # Arguments
    ///
    /// * `key` - Header name to look up
    ///
    /// # Returns
    ///
    /// `Some(&str)` with the header value if present, `None` otherwise.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Parses the Content-Length header.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        content_length_of(&self.headers)
    }

    /// Whether the client asked for the connection to be closed after the
    /// response. Only the literal value `close` counts; anything else keeps
    /// the connection alive.
    pub fn wants_close(&self) -> bool {
        self.header("Connection") == Some("close")
    }
}
