//! HTTP protocol implementation.
//!
//! This module implements the HTTP/1.1 subset a static origin server needs:
//! GET and HEAD, persistent connections and `If-Modified-Since`.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection request-response state machine
//! - **`parser`**: Reads a request line's header block off the stream
//! - **`request`**: Parsed request representation
//! - **`date`**: HTTP date parsing and rendering
//! - **`resolver`**: Maps request targets to files under the document root
//! - **`handler`**: Picks the status and body for a request
//! - **`response`**: Status table and response builder
//! - **`writer`**: Serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for a request line (idle timeout, blank lines skipped)
//!        └──────┬──────┘
//!               │ Request line received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse headers, resolve file, build response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ 501 / abandoned headers → Closed
//! ```
//!
//! Timeout, end of stream or an I/O error in any state also leads to
//! `Closed`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fileserve::config::Config;
//! use fileserve::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = Arc::new(Config::default());
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let cfg = Arc::clone(&cfg);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, cfg);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod date;
pub mod handler;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;
