//! Turns a parsed request and its resolved file into a response.

use anyhow::Context;
use chrono::{DateTime, Utc};
use tokio::fs;

use crate::http::date::format_http_date;
use crate::http::request::Request;
use crate::http::resolver::ResolvedResource;
use crate::http::response::{error_page, Response, ResponseBuilder, StatusCode};

/// Decides the final status for `request`.
///
/// A parser error wins; otherwise a missing or non-regular file is 404, and
/// a file not modified after `If-Modified-Since` (compared in whole
/// seconds) is 304.
pub fn resolve_status(request: &Request, resource: &ResolvedResource) -> StatusCode {
    if request.status != StatusCode::Ok {
        return request.status;
    }

    if !resource.is_servable() {
        return StatusCode::NotFound;
    }

    if let (Some(since), Some(modified)) = (request.if_modified_since, resource.modified) {
        if modified.timestamp() <= since.timestamp() {
            return StatusCode::NotModified;
        }
    }

    StatusCode::Ok
}

/// Builds the response for one request cycle.
///
/// HEAD requests and 304 responses carry no body and report
/// `Content-Length: 0`. A 200 body is the whole file, read into memory in
/// one go; any other status gets a generated error page.
///
/// Fails only if the file disappears or becomes unreadable between
/// resolution and the read.
pub async fn respond(
    request: &Request,
    resource: &ResolvedResource,
    server_name: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<Response> {
    let status = resolve_status(request, resource);

    let body = if request.is_head() || status == StatusCode::NotModified {
        Vec::new()
    } else if status.is_success() {
        fs::read(&resource.path)
            .await
            .with_context(|| format!("reading {}", resource.path.display()))?
    } else {
        error_page(status)
    };

    let last_modified = if request.status.is_success() {
        resource.modified.unwrap_or(now)
    } else {
        now
    };

    Ok(ResponseBuilder::new(status)
        .header("Date", format_http_date(now))
        .header("Server", server_name)
        .header("Last-Modified", format_http_date(last_modified))
        .body(body)
        .build())
}
