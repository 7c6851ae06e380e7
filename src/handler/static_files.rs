//! Static file serving module
//!
//! Handles static file loading, MIME type detection, and response
//! building with `ETag` conditional support.

use crate::config::ContentConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve the default index asset for `/`
pub async fn serve_index(ctx: &RequestContext<'_>, content: &ContentConfig) -> Response<Full<Bytes>> {
    let index_path = Path::new(&content.static_dir).join(&content.index_file);
    match load_single_file(&index_path).await {
        Some((data, content_type)) => {
            build_static_file_response(&data, content_type, ctx.if_none_match.as_deref(), ctx.is_head)
        }
        None => http::build_404_response(),
    }
}

/// Serve a static file resolved from the request path
pub async fn serve_static(ctx: &RequestContext<'_>, content: &ContentConfig) -> Response<Full<Bytes>> {
    match load_from_directory(&content.static_dir, ctx.path).await {
        Some((data, content_type)) => {
            build_static_file_response(&data, content_type, ctx.if_none_match.as_deref(), ctx.is_head)
        }
        None => http::build_404_response(),
    }
}

/// Load a static file from the static root
///
/// The request path is joined under the static root and the resolved
/// path must canonicalize to somewhere inside it.
pub async fn load_from_directory(static_dir: &str, path: &str) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");
    let file_path = Path::new(static_dir).join(&clean_path);

    // Security: ensure file_path is within static_dir
    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }
    if !file_path_canonical.is_file() {
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path_canonical.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(
        file_path_canonical
            .extension()
            .and_then(|e| e.to_str()),
    );

    Some((content, content_type))
}

/// Load a single file by path
pub async fn load_single_file(path: &Path) -> Option<(Vec<u8>, &'static str)> {
    let content = fs::read(path).await.ok()?;
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(Bytes::from(data.to_owned()), content_type, &etag, is_head)
}
