//! HTTP request handlers and routing.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::parser::{HttpRequest, Method};
use crate::server::{HttpResponse, Error};

/// Type alias for a boxed future that returns a Result<HttpResponse, Error>.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>>;

/// Type alias for a handler function that takes an HttpRequest and returns a HandlerFuture.
pub type HandlerFn = Arc<dyn Fn(HttpRequest) -> HandlerFuture + Send + Sync>;

/// Represents a route in the HTTP server.
///
/// The path is a pattern: segments written as `{name}` match any single
/// non-empty segment and are captured under `name`.
pub struct Route {
    /// The path pattern to match.
    pub path: String,
    /// The HTTP methods to match.
    pub methods: Vec<Method>,
    /// The handler function.
    pub handler: HandlerFn,
}

impl Route {
    /// Match a request path against this route's pattern.
    ///
    /// Returns the captured parameters on success. Any query string on
    /// `path` must already be stripped.
    pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let mut pattern = self.path.split('/');
        let mut actual = path.split('/');
        let mut params = HashMap::new();

        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return Some(params),
                (Some(expected), Some(segment)) => {
                    let capture = expected.strip_prefix('{').and_then(|s| s.strip_suffix('}'));
                    if let Some(name) = capture {
                        if segment.is_empty() {
                            return None;
                        }
                        params.insert(name.to_string(), segment.to_string());
                    } else if expected != segment {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }
}
