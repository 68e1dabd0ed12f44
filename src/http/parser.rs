use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::timeout;
use tracing::debug;

use crate::http::date::parse_http_date;
use crate::http::request::{Method, Request};
use crate::http::response::StatusCode;

const IF_MODIFIED_SINCE: &str = "if-modified-since:";

/// Longest request or header line accepted, terminator included.
pub const MAX_LINE_LEN: usize = 8192;

#[derive(Debug)]
pub enum ParseError {
    MissingTarget,
    UnsupportedMethod(String),
    InvalidDate(String),
}

impl ParseError {
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::MissingTarget | ParseError::InvalidDate(_) => StatusCode::BadRequest,
            ParseError::UnsupportedMethod(_) => StatusCode::NotImplemented,
        }
    }
}

/// Reads one line, without its `\n` or `\r\n` terminator.
///
/// Returns `Ok(None)` at end of stream. `limit` bounds each wait for more
/// data, not the whole line; if nothing arrives within it the error kind is
/// [`io::ErrorKind::TimedOut`]. A line longer than [`MAX_LINE_LEN`] fails
/// with [`io::ErrorKind::InvalidData`].
pub async fn read_line<R>(reader: &mut R, limit: Duration) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();

    loop {
        let available = timeout(limit, reader.fill_buf())
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "no data before timeout"))??;

        if available.is_empty() {
            if buf.is_empty() {
                return Ok(None);
            }
            break;
        }

        let (used, done) = match available.iter().position(|b| *b == b'\n') {
            Some(i) => (i + 1, true),
            None => (available.len(), false),
        };
        buf.extend_from_slice(&available[..used]);
        reader.consume(used);

        if buf.len() > MAX_LINE_LEN {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "line too long"));
        }
        if done {
            break;
        }
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Parses a request whose request line has already been read, consuming
/// its header block from `reader`.
///
/// Protocol problems are reported through [`Request::status`], never as
/// errors; `Err` means the stream itself failed while reading headers.
pub async fn parse_request<R>(
    request_line: &str,
    reader: &mut R,
    line_timeout: Duration,
) -> io::Result<Request>
where
    R: AsyncBufRead + Unpin,
{
    let mut parts = request_line.split_whitespace();

    let (Some(command), Some(raw_target)) = (parts.next(), parts.next()) else {
        reject(&ParseError::MissingTarget, request_line);
        drain_headers(reader, line_timeout).await;
        return Ok(Request::rejected(StatusCode::BadRequest));
    };
    let version = parts.next().map(str::to_string);

    let Some(method) = Method::from_str(command) else {
        let err = ParseError::UnsupportedMethod(command.to_string());
        reject(&err, request_line);
        drain_headers(reader, line_timeout).await;

        let mut request = Request::rejected(err.status());
        request.command = command.to_string();
        request.version = version;
        return Ok(request);
    };

    let mut request = Request {
        command: command.to_string(),
        method: Some(method),
        target: normalize_target(raw_target),
        version,
        if_modified_since: None,
        status: StatusCode::Ok,
        headers_complete: false,
    };

    while let Some(line) = read_line(reader, line_timeout).await? {
        if line.is_empty() {
            request.headers_complete = true;
            return Ok(request);
        }

        let Some(value) = header_value(&line, IF_MODIFIED_SINCE) else {
            continue;
        };

        match parse_http_date(value) {
            Some(since) => request.if_modified_since = Some(since),
            None => {
                let err = ParseError::InvalidDate(value.to_string());
                reject(&err, request_line);
                request.status = err.status();
                return Ok(request);
            }
        }
    }

    // Client closed mid-headers; answer what we have.
    request.headers_complete = true;
    Ok(request)
}

/// Reduces an absolute URI (`http://host/path`) to its path.
///
/// Anything not starting with `http` (any case) is returned unchanged. An
/// absolute URI with no path after the authority becomes `/`.
///
/// # Example
///
/// ```
/// # use fileserve::http::parser::normalize_target;
/// assert_eq!(normalize_target("HTTP://example.com/a.html"), "/a.html");
/// assert_eq!(normalize_target("http://example.com"), "/");
/// assert_eq!(normalize_target("/a.html"), "/a.html");
/// ```
pub fn normalize_target(raw: &str) -> String {
    let is_absolute = raw
        .get(..4)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http"));

    if !is_absolute {
        return raw.to_string();
    }

    raw.find("//")
        .and_then(|scheme_end| {
            let authority = scheme_end + 2;
            raw[authority..].find('/').map(|slash| &raw[authority + slash..])
        })
        .unwrap_or("/")
        .to_string()
}

/// Returns the trimmed value when `line` starts with `name` (which includes
/// its colon), compared case-insensitively.
fn header_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let prefix = line.as_bytes().get(..name.len())?;

    if prefix.eq_ignore_ascii_case(name.as_bytes()) {
        Some(line[name.len()..].trim())
    } else {
        None
    }
}

/// Discards header lines up to the blank line so the next request starts
/// at a line boundary. Read failures end the drain quietly; the connection
/// loop sees them again on its next read.
async fn drain_headers<R>(reader: &mut R, line_timeout: Duration)
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match read_line(reader, line_timeout).await {
            Ok(Some(line)) if !line.is_empty() => continue,
            Ok(_) => break,
            Err(e) => {
                debug!(error = %e, "Stopped draining headers");
                break;
            }
        }
    }
}

fn reject(err: &ParseError, request_line: &str) {
    debug!(
        error = ?err,
        status = err.status().as_u16(),
        request_line,
        "Rejecting request"
    );
}
