//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, route matching, and dispatching.

use crate::config::AppState;
use crate::handler::{pages, static_files};
use crate::http::{self, cache};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub cache_policy: cache::CachePolicy,
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type: the body is never read, only its declared
/// Content-Length is checked.
pub async fn handle_request<B>(
    req: Request<B>,
    remote_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);

    // 1. Check HTTP method
    let response = if let Some(resp) = check_http_method(&method, state.config.http.enable_cors) {
        resp
    // 2. Check declared body size
    } else if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        resp
    } else {
        // 3. Log headers if enabled
        logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

        // 4. Extract headers needed downstream
        let ctx = RequestContext {
            path: uri.path(),
            is_head: method == Method::HEAD,
            if_none_match: req
                .headers()
                .get("if-none-match")
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            // Debug pages must reach the browser fresh on every request
            cache_policy: if state.config.server.debug {
                cache::CachePolicy::NoCache
            } else {
                cache::CachePolicy::default()
            },
        };

        // 5. Dispatch
        route_request(&ctx, &state).await
    };

    if access_log {
        let mut entry = AccessLogEntry::new(
            remote_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_label(version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.referer = header_string(&req, "referer");
        entry.user_agent = header_string(&req, "user-agent");
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else {
        "1.1"
    }
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path and configuration
async fn route_request(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let routes = &state.config.routes;

    // 1. Fixed page routes (exact match)
    if let Some(template_name) = routes.pages.get(ctx.path) {
        return pages::serve_page(ctx, template_name, state).await;
    }

    // 2. Favicon routes
    if routes.favicon_paths.iter().any(|p| ctx.path == p) {
        return static_files::serve_favicon(ctx, routes).await;
    }

    // 3. Static asset prefix
    let prefix = routes.static_prefix.as_str();
    if ctx.path == prefix || ctx.path.starts_with(&format!("{prefix}/")) {
        return static_files::serve_asset(ctx, routes).await;
    }

    // 4. Everything else is not found
    http::build_404_response()
}

/// Build a 200/304 response for already-loaded content, honoring
/// `If-None-Match` and HEAD semantics
pub fn respond_conditional(
    ctx: &RequestContext<'_>,
    data: Bytes,
    content_type: &str,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);
    let cache_control = ctx.cache_policy.to_header_value();
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag, &cache_control);
    }
    http::build_cached_response(data, content_type, &etag, ctx.is_head, &cache_control)
}
