//! fileserve - static file HTTP/1.1 origin server
//!
//! Serves GET and HEAD from a document root over persistent connections,
//! with conditional retrieval via `If-Modified-Since`.

pub mod config;
pub mod http;
pub mod server;
