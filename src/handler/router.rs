//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! dispatch to the Markdown API or static serving, and access logging.

use crate::api;
use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let is_head = method == Method::HEAD;

    let response = if let Some(resp) = check_http_method(&method) {
        resp
    } else {
        let ctx = RequestContext {
            path: uri.path(),
            is_head,
            if_none_match: header_string(&req, "if-none-match"),
        };
        route_request(&ctx, uri.query(), &state).await
    };

    if state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed)
    {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_string(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = content_length(&response);
        entry.referer = header_string(&req, "referer");
        entry.user_agent = header_string(&req, "user-agent");
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return a response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path
///
/// The API endpoints are matched exactly; `/` is rewritten to the index
/// asset; everything else falls through to static file serving.
async fn route_request(
    ctx: &RequestContext<'_>,
    raw_query: Option<&str>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    match ctx.path {
        "/api/files" => api::serve_file_tree(state, ctx.is_head),
        "/api/file" => api::serve_file_content(raw_query, state, ctx.is_head).await,
        "/" => static_files::serve_index(ctx, &state.config.content).await,
        _ => static_files::serve_static(ctx, &state.config.content).await,
    }
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_string(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

fn content_length(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
