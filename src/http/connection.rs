use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bytes::{Buf, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::http::parser::{parse_http_request, parse_truncated_request, ParseError};
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::routing::Router;

/// How long a connection may sit without delivering a complete request.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

const READ_CHUNK: usize = 4096;

pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    router: Arc<Router>,
    idle_timeout: Duration,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

/// Why a request could not be read.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, router: Arc<Router>) -> Self {
        Self::with_idle_timeout(stream, router, DEFAULT_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(stream: S, router: Arc<Router>, idle_timeout: Duration) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            router,
            idle_timeout,
        }
    }

    /// Serves requests until the peer goes away, idles out, sends something
    /// unparseable or asks to close.
    ///
    /// Those endings are all `Ok`. An `Err` means a response could not be
    /// produced or delivered.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.state = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => self.next_request().await,

                ConnectionState::Processing(req) => {
                    let keep_alive = !req.wants_close();
                    let method = req.method.clone();
                    let path = req.path.clone();

                    // Handlers touch the file system synchronously.
                    let router = Arc::clone(&self.router);
                    let response = tokio::task::spawn_blocking(move || router.route(&req))
                        .await
                        .context("routing task failed")?;

                    tracing::debug!(
                        %method,
                        %path,
                        status = response.status.as_u16(),
                        "Handled request"
                    );

                    ConnectionState::Writing(ResponseWriter::new(&response), keep_alive)
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    writer
                        .write_to_stream(&mut self.stream)
                        .await
                        .context("failed to send response")?;

                    if keep_alive {
                        ConnectionState::Reading // go back for next request
                    } else {
                        let _ = self.stream.shutdown().await;
                        ConnectionState::Closed
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            };
        }

        Ok(())
    }

    /// Waits for the next request under the idle deadline, which is re-armed
    /// on every call.
    async fn next_request(&mut self) -> ConnectionState {
        match timeout(self.idle_timeout, self.read_request()).await {
            Ok(Ok(Some(req))) => ConnectionState::Processing(req),
            Ok(Ok(None)) => {
                tracing::debug!("Peer closed connection");
                ConnectionState::Closed
            }
            Ok(Err(ReadError::Parse(e))) => {
                tracing::debug!(error = %e, "Dropping connection");
                ConnectionState::Closed
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Error reading request");
                ConnectionState::Closed
            }
            Err(_) => {
                tracing::debug!(timeout = ?self.idle_timeout, "Connection idle, closing");
                ConnectionState::Closed
            }
        }
    }

    /// Reads one request, or `None` once the peer has finished sending
    /// without starting another.
    pub async fn read_request(&mut self) -> Result<Option<Request>, ReadError> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Err(e.into()),
            }

            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                return match parse_truncated_request(&self.buffer)? {
                    Some((request, consumed)) => {
                        self.buffer.advance(consumed);
                        Ok(Some(request))
                    }
                    None => Ok(None),
                };
            }
        }
    }
}
