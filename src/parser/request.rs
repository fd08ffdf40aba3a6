//! Request representation and parsing.

use std::collections::HashMap;
use serde::de::DeserializeOwned;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

/// A parsed HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// The request target as sent, query string included.
    pub path: String,
    pub version: HttpVersion,
    /// Header names keep the case they were sent with.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    /// Parameters captured from the matched route pattern, e.g. `{id}`.
    pub path_params: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a request with an empty body.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        version: HttpVersion,
        headers: HashMap<String, String>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            version,
            headers,
            body: Vec::new(),
            path_params: HashMap::new(),
        }
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// The request path with any query string removed. Routes match on this.
    pub fn route_path(&self) -> &str {
        match self.path.split_once('?') {
            Some((path, _)) => path,
            None => &self.path,
        }
    }

    /// Look up a header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Whether the body is labelled `application/json`.
    pub fn is_json(&self) -> bool {
        self.header("Content-Type")
            .is_some_and(|ct| ct.starts_with("application/json"))
    }

    /// Decode the body as JSON.
    ///
    /// A body without a `Content-Type` is decoded anyway; one labelled with
    /// any other content type is refused.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if let Some(content_type) = self.header("Content-Type") {
            if !self.is_json() {
                return Err(Error::NotJson(content_type.to_string()));
            }
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// A parameter captured from the route pattern.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }
}

/// Offset of the blank line ending the head, and the terminator's length.
///
/// Both `\r\n\r\n` and a bare `\n\n` are accepted; whichever comes first wins.
fn find_header_end(input: &[u8]) -> Option<(usize, usize)> {
    let crlf = input.windows(4).position(|w| w == b"\r\n\r\n").map(|i| (i, 4));
    let lf = input.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));

    match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// The `Content-Length` declared in a raw head, if any.
fn content_length(head: &[u8]) -> Option<usize> {
    let head = std::str::from_utf8(head).ok()?;
    head.lines().skip(1).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("Content-Length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

/// Total length of the request that starts at `input[0]`.
///
/// `None` while the head is still incomplete. Once it is complete this is
/// the head length plus the declared `Content-Length` (zero when absent),
/// which tells a reader how many bytes to wait for.
pub fn request_len(input: &[u8]) -> Option<usize> {
    let (end, terminator) = find_header_end(input)?;
    let body_len = content_length(&input[..end]).unwrap_or(0);
    Some(end + terminator + body_len)
}

fn parse_request_line(line: &str) -> Result<(Method, String, HttpVersion), Error> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [method, path, version] => Ok((method.parse()?, path.to_string(), version.parse()?)),
        _ => Err(Error::BadRequestLine(line.to_string())),
    }
}

fn parse_headers<'a>(
    lines: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, String>, Error> {
    let mut headers = HashMap::new();
    for line in lines.take_while(|line| !line.is_empty()) {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::BadHeader(line.to_string()))?;
        // A repeated header keeps its last value
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok(headers)
}

/// Parse a complete request.
///
/// Bytes past the declared `Content-Length` are ignored. Without a
/// `Content-Length`, everything after the head is the body.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let (head, rest) = match find_header_end(input) {
        Some((end, terminator)) => (&input[..end], &input[end + terminator..]),
        None => (input, &[][..]),
    };

    let head_str = std::str::from_utf8(head).map_err(|_| Error::NotUtf8)?;
    let mut lines = head_str.lines();

    let request_line = lines.next().ok_or(Error::Empty)?;
    let (method, path, version) = parse_request_line(request_line)?;
    let headers = parse_headers(lines)?;

    let request = HttpRequest::new(method, path, version, headers);
    if version.requires_host() && !request.has_header("Host") {
        return Err(Error::MissingHost);
    }

    let body = match content_length(head) {
        Some(expected) if expected > rest.len() => {
            return Err(Error::IncompleteBody { expected, received: rest.len() });
        }
        Some(expected) => &rest[..expected],
        None => rest,
    };

    Ok(request.with_body(body))
}
