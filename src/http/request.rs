use chrono::{DateTime, Utc};

use crate::http::response::StatusCode;

/// HTTP request methods the server implements.
///
/// Anything else on the request line is answered with 501 Not Implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
}

/// A request read off the connection, together with the outcome decided
/// while parsing it.
///
/// `status` starts as `Ok` and is only ever set to an error by the parser;
/// the handler takes it from there. A request is built fresh for every
/// cycle on the connection and dropped once its response is written.
#[derive(Debug, Clone)]
pub struct Request {
    /// The method token exactly as received
    pub command: String,
    /// The recognized method, `None` when the command is unsupported or missing
    pub method: Option<Method>,
    /// Absolute path of the target (absolute URIs are reduced to their path)
    pub target: String,
    /// Protocol version token, if one was sent
    pub version: Option<String>,
    /// Parsed `If-Modified-Since` header
    pub if_modified_since: Option<DateTime<Utc>>,
    /// Outcome established during parsing
    pub status: StatusCode,
    /// Whether the header block was fully consumed from the stream
    pub headers_complete: bool,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    command: Option<String>,
    target: String,
    version: Option<String>,
    if_modified_since: Option<DateTime<Utc>>,
    status: StatusCode,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive)
    ///
    /// # Returns
    ///
    /// `Some(Method)` for `GET` or `HEAD`, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use fileserve::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("POST"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "HEAD" => Some(Method::HEAD),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            command: None,
            target: "/".to_string(),
            version: None,
            if_modified_since: None,
            status: StatusCode::Ok,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.command = Some(method.as_str().to_string());
        self
    }

    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn if_modified_since(mut self, since: DateTime<Utc>) -> Self {
        self.if_modified_since = Some(since);
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let command = self.command.ok_or("method missing")?;
        let method = Method::from_str(&command);

        Ok(Request {
            command,
            method,
            target: self.target,
            version: self.version,
            if_modified_since: self.if_modified_since,
            status: self.status,
            headers_complete: true,
        })
    }
}

impl Request {
    /// A request that failed before a method could be read.
    pub(crate) fn rejected(status: StatusCode) -> Self {
        Self {
            command: String::new(),
            method: None,
            target: "/".to_string(),
            version: None,
            if_modified_since: None,
            status,
            headers_complete: true,
        }
    }

    pub fn is_head(&self) -> bool {
        self.method == Some(Method::HEAD)
    }

    /// Determines whether the connection may carry another request after
    /// this one is answered.
    ///
    /// An unsupported method, or a header block abandoned part way through,
    /// leaves the stream in an unknown position, so the connection closes.
    pub fn keep_alive(&self) -> bool {
        self.status != StatusCode::NotImplemented && self.headers_complete
    }
}
