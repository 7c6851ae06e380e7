//! HTTP response building module
//!
//! Provides builders for the status codes this server emits. All
//! responses, success and failure alike, carry
//! `Access-Control-Allow-Origin: *` for the local viewer front-end.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .header("Access-Control-Max-Age", "86400")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build JSON response for the file-tree API
pub fn build_json_response(body: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = body.len();
    let body = if is_head { Bytes::new() } else { Bytes::from(body) };

    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Content-Length", content_length)
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("JSON", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build plain-text response for raw Markdown file contents
pub fn build_text_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", content_length)
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("text", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build success response for static assets with cache control
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cors_header(resp: &Response<Full<Bytes>>) -> Option<&str> {
        resp.headers()
            .get("Access-Control-Allow-Origin")
            .and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_every_builder_sets_cors() {
        assert_eq!(cors_header(&build_404_response()), Some("*"));
        assert_eq!(cors_header(&build_405_response()), Some("*"));
        assert_eq!(cors_header(&build_options_response()), Some("*"));
        assert_eq!(cors_header(&build_304_response("\"e\"")), Some("*"));
        assert_eq!(
            cors_header(&build_json_response("{}".to_string(), false)),
            Some("*")
        );
        assert_eq!(
            cors_header(&build_text_response("# Hello".to_string(), false)),
            Some("*")
        );
        assert_eq!(
            cors_header(&build_cached_response(
                Bytes::from_static(b"x"),
                "text/plain",
                "\"e\"",
                false
            )),
            Some("*")
        );
    }

    #[test]
    fn test_text_response_content_type() {
        let resp = build_text_response("# Hello".to_string(), false);
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_head_keeps_content_length() {
        let resp = build_json_response("{\"a.md\":true}".to_string(), true);
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "13");
    }
}
