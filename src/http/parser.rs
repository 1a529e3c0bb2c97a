use crate::http::request::{content_length_of, Method, Request};
use std::collections::HashMap;
use thiserror::Error;

/// Upper bound on the request line plus header block.
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// More bytes are needed before a request can be produced.
    #[error("incomplete request")]
    Incomplete,
    /// The request line did not split into method, target and version.
    #[error("malformed request line")]
    MalformedRequestLine,
    #[error("header section exceeds {} bytes", MAX_HEADER_BYTES)]
    HeadersTooLarge,
}

/// Parses one request from the front of `buf`.
///
/// On success returns the request and the number of bytes it occupied, so
/// pipelined requests that follow stay in the caller's buffer.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    parse(buf, false)
}

/// Parses whatever is left in `buf` once the peer has stopped sending.
///
/// Returns `Ok(None)` when not even a full request line arrived. Otherwise
/// a truncated header block ends at the last complete line and a short body
/// is dropped, leaving the request with an empty body.
pub fn parse_truncated_request(buf: &[u8]) -> Result<Option<(Request, usize)>, ParseError> {
    if next_line(buf, 0).is_none() {
        return Ok(None);
    }
    parse(buf, true).map(Some)
}

fn parse(buf: &[u8], at_eof: bool) -> Result<(Request, usize), ParseError> {
    let Some((request_line, mut pos)) = next_line(buf, 0) else {
        return Err(incomplete(buf));
    };
    let (method, path, version) = parse_request_line(request_line)?;

    // Headers
    let mut headers = HashMap::new();

    loop {
        let Some((line, next)) = next_line(buf, pos) else {
            if at_eof {
                pos = buf.len();
                break;
            }
            return Err(incomplete(buf));
        };
        pos = next;
        if pos > MAX_HEADER_BYTES {
            return Err(ParseError::HeadersTooLarge);
        }

        let line = String::from_utf8_lossy(line);
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        // A line without a colon ends the header block; it is not an error.
        let Some((key, value)) = line.split_once(':') else {
            break;
        };

        headers.insert(key.to_string(), value.trim().to_string());
    }

    // Body
    let len = content_length_of(&headers);

    let mut body = Vec::new();
    if len > 0 {
        let available = buf.len() - pos;
        if available >= len {
            body = buf[pos..pos + len].to_vec();
            pos += len;
        } else if at_eof {
            pos = buf.len();
        } else {
            return Err(ParseError::Incomplete);
        }
    }

    let request = Request {
        method,
        path,
        version,
        headers,
        body,
    };

    Ok((request, pos))
}

fn parse_request_line(line: &[u8]) -> Result<(Method, String, String), ParseError> {
    let line = String::from_utf8_lossy(line);
    let parts: Vec<&str> = line.trim().split(' ').collect();

    let [method, path, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequestLine);
    };

    Ok((Method::parse(method), path.to_string(), version.to_string()))
}

/// Returns the line starting at `pos` (without its `\n`) and the offset just
/// past it. A trailing `\r` is left in place and removed by trimming.
fn next_line(buf: &[u8], pos: usize) -> Option<(&[u8], usize)> {
    let rest = buf.get(pos..)?;
    let end = rest.iter().position(|&b| b == b'\n')?;
    Some((&rest[..end], pos + end + 1))
}

fn incomplete(buf: &[u8]) -> ParseError {
    if buf.len() > MAX_HEADER_BYTES {
        ParseError::HeadersTooLarge
    } else {
        ParseError::Incomplete
    }
}
