//! Route lookup and dispatch.
//!
//! The table is built once at startup and never mutated, so it is shared
//! between connections behind an `Arc` without locking. Exact paths are a
//! hash lookup; prefixes are scanned in registration order and the first
//! literal (byte-wise) prefix match wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::http::request::Request;
use crate::http::response::Response;
use crate::routing::handlers;
use crate::storage::Storage;

/// A route handler. Handlers cannot fail; domain errors become responses.
pub type Handler = Arc<dyn Fn(&Request) -> Response + Send + Sync>;

/// The only content coding the server will advertise.
const SUPPORTED_ENCODING: &str = "gzip";

pub struct Router {
    exact: HashMap<String, Handler>,
    prefixes: Vec<(String, Handler)>,
}

pub struct RouterBuilder {
    exact: HashMap<String, Handler>,
    prefixes: Vec<(String, Handler)>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            exact: HashMap::new(),
            prefixes: Vec::new(),
        }
    }

    /// Binds `handler` to exactly `path`. Re-registering a path replaces it.
    pub fn exact<F>(mut self, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.exact.insert(path.into(), Arc::new(handler));
        self
    }

    /// Appends a prefix route. Earlier prefixes take precedence.
    pub fn prefix<F>(mut self, prefix: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.prefixes.push((prefix.into(), Arc::new(handler)));
        self
    }

    pub fn build(self) -> Router {
        Router {
            exact: self.exact,
            prefixes: self.prefixes,
        }
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// The server's route table: `/` and `/user-agent` exactly, then the
    /// `/echo/` and `/files/` prefixes in that order.
    pub fn standard(storage: Arc<dyn Storage>) -> Self {
        Self::builder()
            .exact("/", handlers::root)
            .exact("/user-agent", handlers::user_agent)
            .prefix(handlers::ECHO_PREFIX, handlers::echo)
            .prefix(handlers::FILES_PREFIX, move |req: &Request| {
                handlers::files(req, storage.as_ref())
            })
            .build()
    }

    /// Finds the handler for `path`, exact routes first.
    pub fn lookup(&self, path: &str) -> Option<&Handler> {
        self.exact.get(path).or_else(|| {
            self.prefixes
                .iter()
                .find(|(prefix, _)| path.starts_with(prefix.as_str()))
                .map(|(_, handler)| handler)
        })
    }

    /// Dispatches `request` and labels the response with the negotiated
    /// content coding. Unmatched paths get a bare 404.
    ///
    /// The coding is only a label: the body and its `Content-Length` are
    /// left exactly as the handler produced them.
    pub fn route(&self, request: &Request) -> Response {
        let Some(handler) = self.lookup(&request.path) else {
            return Response::not_found();
        };

        let mut response = handler(request);

        if let Some(encoding) = request
            .header("Accept-Encoding")
            .and_then(negotiate_encoding)
        {
            response.set_header("Content-Encoding", encoding);
        }

        response
    }

    /// Registered prefixes, in match order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(|(prefix, _)| prefix.as_str())
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("exact", &self.exact.keys().collect::<Vec<_>>())
            .field("prefixes", &self.prefixes().collect::<Vec<_>>())
            .finish()
    }
}

/// Filters an `Accept-Encoding` value down to the codings the server admits.
///
/// Tokens are split on commas and trimmed; only the literal `gzip` survives
/// (no q-values, no wildcards). Returns `None` when nothing is left.
///
/// ```
/// # use courier::routing::router::negotiate_encoding;
/// assert_eq!(negotiate_encoding("gzip, br").as_deref(), Some("gzip"));
/// assert_eq!(negotiate_encoding("br, *"), None);
/// ```
pub fn negotiate_encoding(accept_encoding: &str) -> Option<String> {
    let kept: Vec<&str> = accept_encoding
        .split(',')
        .map(str::trim)
        .filter(|token| *token == SUPPORTED_ENCODING)
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(", "))
    }
}
