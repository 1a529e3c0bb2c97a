//! Route handlers.
//!
//! Each one maps a request to a response and never fails. File errors are
//! folded into status codes and their cause is only visible in the log.

use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::storage::Storage;

pub const ECHO_PREFIX: &str = "/echo/";
pub const FILES_PREFIX: &str = "/files/";

/// `/` — 200 with nothing else.
pub fn root(_request: &Request) -> Response {
    Response::empty(StatusCode::Ok)
}

/// `/user-agent` — echoes the `User-Agent` header, empty if absent.
pub fn user_agent(request: &Request) -> Response {
    let agent = request.header("User-Agent").unwrap_or_default();
    Response::text(agent)
}

/// `/echo/<s>` — echoes the raw path suffix.
pub fn echo(request: &Request) -> Response {
    let suffix = request
        .path
        .strip_prefix(ECHO_PREFIX)
        .unwrap_or_default();
    Response::text(suffix)
}

/// `/files/<name>` — POST stores the body, anything else reads the file.
///
/// A failed write still answers 201 Created. A failed read answers a bare
/// 404 whatever the underlying cause.
pub fn files(request: &Request, storage: &dyn Storage) -> Response {
    let name = request
        .path
        .strip_prefix(FILES_PREFIX)
        .unwrap_or_default();

    if request.method == Method::POST {
        if let Err(e) = storage.write(name, &request.body) {
            tracing::warn!(file = name, error = %e, "Failed to store file");
        }
        return Response::empty(StatusCode::Created);
    }

    match storage.read(name) {
        Ok(contents) => {
            Response::with_content(StatusCode::Ok, "application/octet-stream", contents)
        }
        Err(e) => {
            tracing::debug!(file = name, error = %e, "Failed to read file");
            Response::not_found()
        }
    }
}
