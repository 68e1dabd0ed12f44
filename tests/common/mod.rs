//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use fileserve::config::Config;
use fileserve::http::connection::Connection;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// A throwaway document root under the system temp dir, removed on drop.
pub struct TestRoot {
    pub path: PathBuf,
}

impl TestRoot {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("fileserve-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn root(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.path.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn write_with_mtime(&self, rel: &str, contents: &[u8], mtime: SystemTime) -> PathBuf {
        let path = self.write(rel, contents);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
        path
    }

    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path.join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn config(&self) -> Arc<Config> {
        let mut cfg = Config::default();
        cfg.static_files.root = self.root();
        cfg.server.idle_timeout_ms = 200;
        Arc::new(cfg)
    }
}

impl Drop for TestRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// A response as seen by the client.
#[derive(Debug)]
pub struct RawResponse {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn header_names(&self) -> Vec<&str> {
        self.headers.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// Splits a byte stream into responses framed by `Content-Length`.
pub fn split_responses(mut bytes: &[u8]) -> Vec<RawResponse> {
    let mut responses = Vec::new();

    while !bytes.is_empty() {
        let end = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("header terminator");
        let head = std::str::from_utf8(&bytes[..end]).unwrap();
        let mut lines = head.split("\r\n");

        let status_line = lines.next().unwrap().to_string();
        let headers: Vec<(String, String)> = lines
            .map(|line| {
                let (k, v) = line.split_once(": ").unwrap();
                (k.to_string(), v.to_string())
            })
            .collect();

        let len: usize = headers
            .iter()
            .find(|(k, _)| k == "Content-Length")
            .map(|(_, v)| v.parse().unwrap())
            .unwrap_or(0);

        let body_start = end + 4;
        let body = bytes[body_start..body_start + len].to_vec();
        bytes = &bytes[body_start + len..];

        responses.push(RawResponse {
            status_line,
            headers,
            body,
        });
    }

    responses
}

/// Runs a connection over an in-memory pipe: sends `input`, half-closes
/// the client side, and collects everything the server writes until it
/// closes.
pub async fn exchange(cfg: Arc<Config>, input: &[u8]) -> (Vec<u8>, anyhow::Result<()>) {
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    let task = tokio::spawn(async move { Connection::new(server, cfg).run().await });

    client.write_all(input).await.unwrap();
    let _ = client.shutdown().await;

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();

    (out, task.await.unwrap())
}
