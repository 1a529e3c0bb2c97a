//! Courier - a small HTTP/1.1 server over raw TCP
//!
//! Core library for the protocol engine, routing and file storage.

pub mod config;
pub mod http;
pub mod routing;
pub mod server;
pub mod storage;
