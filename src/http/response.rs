//! HTTP response building module
//!
//! Provides builders for the status codes this server emits, decoupled
//! from specific business logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 200 response with cache validators
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
    cache_control: &str,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", cache_control)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, cache_control: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", cache_control)
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
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build 500 Internal Server Error response
///
/// `detail` carries the failure description in debug mode; otherwise the
/// body stays generic.
pub fn build_500_response(detail: Option<&str>) -> Response<Full<Bytes>> {
    let body = match detail {
        Some(d) => format!("500 Internal Server Error\n\n{d}"),
        None => "500 Internal Server Error".to_string(),
    };

    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::from("500 Internal Server Error")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_response_headers() {
        let resp = build_cached_response(
            Bytes::from("<html></html>"),
            "text/html; charset=utf-8",
            "\"abc\"",
            false,
            "public, max-age=3600",
        );
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
        assert_eq!(resp.headers()["ETag"], "\"abc\"");
        assert_eq!(resp.headers()["Content-Length"], "13");
        assert_eq!(resp.headers()["Cache-Control"], "public, max-age=3600");
    }

    #[tokio::test]
    async fn test_head_keeps_content_length_drops_body() {
        use http_body_util::BodyExt;

        let resp =
            build_cached_response(Bytes::from("page"), "text/html", "\"e\"", true, "no-cache");
        assert_eq!(resp.headers()["Content-Length"], "4");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(build_404_response().status(), 404);
        assert_eq!(build_405_response().status(), 405);
        assert_eq!(build_413_response().status(), 413);
        assert_eq!(build_304_response("\"x\"", "no-cache").status(), 304);
        assert_eq!(build_options_response(false).status(), 204);
    }

    #[test]
    fn test_500_detail_only_when_given() {
        let generic = build_500_response(None);
        assert_eq!(generic.status(), 500);

        let verbose = build_500_response(Some("template 'index.html' not found"));
        assert_eq!(verbose.status(), 500);
    }

    #[test]
    fn test_cors_headers_on_options() {
        let resp = build_options_response(true);
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
        assert_eq!(resp.headers()["Allow"], "GET, HEAD, OPTIONS");
    }
}
