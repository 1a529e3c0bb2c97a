//! HTTP/1.1 protocol engine.
//!
//! Requests are framed straight off the socket, with no HTTP library in
//! between. Connections are kept alive unless the client sends
//! `Connection: close`.
//!
//! # Architecture
//!
//! - **`connection`**: the per-connection state machine, idle deadline included
//! - **`parser`**: frames requests out of a byte buffer
//! - **`request`**: parsed request representation
//! - **`response`**: response representation with builder pattern
//! - **`writer`**: serializes responses and writes them to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for a request (idle deadline armed)
//!        └──────┬──────┘
//!               │ Request received          EOF / timeout / malformed → Closed
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route to a handler
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client   write error → Closed
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ no `Connection: close` → Reading (same connection)
//!               └─ `Connection: close`    → Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use courier::http::connection::Connection;
//! use courier::routing::Router;
//! use courier::storage::DirStorage;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let router = Arc::new(Router::standard(Arc::new(DirStorage::new("/tmp"))));
//!     let listener = TcpListener::bind("127.0.0.1:4221").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let router = Arc::clone(&router);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, router);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
