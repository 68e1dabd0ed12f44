use std::io;
use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tracing::{debug, info};

use crate::config::Config;
use crate::http::handler::respond;
use crate::http::parser::{parse_request, read_line};
use crate::http::resolver::resolve;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

pub struct Connection<S> {
    stream: BufReader<S>,
    config: Arc<Config>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(String), // request line
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>) -> Self {
        Self {
            stream: BufReader::new(stream),
            config,
            state: ConnectionState::Reading,
        }
    }

    /// Serves requests until the client goes away, stays idle past the
    /// timeout, or a response requires the connection to close.
    ///
    /// Returns `Err` only for I/O failures on the stream or on a file read.
    /// The stream is released when the connection is dropped.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match self.read_request_line().await? {
                    Some(line) => {
                        self.state = ConnectionState::Processing(line);
                    }
                    None => {
                        self.state = ConnectionState::Closed;
                    }
                },

                ConnectionState::Processing(line) => {
                    let line = std::mem::take(line);
                    let (response, keep_alive) = self.handle_request(&line).await?;

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        debug!("Closing connection after response");
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Waits for the next request line, skipping blank lines.
    ///
    /// `None` means the connection should close quietly: the client hung up
    /// or sent nothing within the idle timeout.
    async fn read_request_line(&mut self) -> anyhow::Result<Option<String>> {
        let idle = self.config.server.idle_timeout();

        loop {
            match read_line(&mut self.stream, idle).await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => return Ok(Some(line)),
                Ok(None) => {
                    debug!("Client closed connection");
                    return Ok(None);
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    debug!(idle_ms = idle.as_millis() as u64, "Idle timeout, closing connection");
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn handle_request(&mut self, request_line: &str) -> anyhow::Result<(Response, bool)> {
        let request = parse_request(
            request_line,
            &mut self.stream,
            self.config.server.idle_timeout(),
        )
        .await?;

        let resource = resolve(&self.config.static_files.root, &request.target).await;
        let response = respond(&request, &resource, &self.config.server.name, Utc::now()).await?;

        info!(
            method = %request.command,
            target = %request.target,
            status = response.status.as_u16(),
            bytes = response.body.len(),
            "Request served"
        );

        Ok((response, request.keep_alive()))
    }
}
