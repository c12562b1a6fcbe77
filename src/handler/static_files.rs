//! Static asset serving module
//!
//! Maps request paths under the static prefix onto files in the static
//! directory, with MIME detection and directory-traversal protection.

use crate::config::RoutesConfig;
use crate::handler::router::{respond_conditional, RequestContext};
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve an asset under the static prefix
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    routes: &RoutesConfig,
) -> Response<Full<Bytes>> {
    match load_asset(&routes.static_dir, ctx.path, &routes.static_prefix).await {
        Some((content, content_type)) => {
            respond_conditional(ctx, Bytes::from(content), content_type)
        }
        None => http::build_404_response(),
    }
}

/// Serve a favicon path from the root of the static directory
pub async fn serve_favicon(
    ctx: &RequestContext<'_>,
    routes: &RoutesConfig,
) -> Response<Full<Bytes>> {
    let file_name = ctx.path.trim_start_matches('/');
    let path = Path::new(&routes.static_dir).join(file_name);
    match fs::read(&path).await {
        Ok(content) => {
            let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
            respond_conditional(ctx, Bytes::from(content), content_type)
        }
        Err(_) => http::build_404_response(),
    }
}

/// Load an asset file, resolving the request path against the static
/// directory and rejecting anything that escapes it
pub async fn load_asset(
    static_dir: &str,
    path: &str,
    static_prefix: &str,
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and collapse traversal sequences
    let clean_path = path.trim_start_matches('/').replace("..", "");

    // Remove the static prefix from the path
    let prefix_clean = static_prefix.trim_matches('/');
    let relative_path = if prefix_clean.is_empty() {
        clean_path.as_str()
    } else {
        clean_path
            .strip_prefix(&format!("{prefix_clean}/"))
            .unwrap_or("")
    };

    if relative_path.is_empty() {
        return None;
    }

    let file_path = Path::new(static_dir).join(relative_path);

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
                "Failed to read file '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    // Determine content type from extension
    let content_type =
        mime::get_content_type(file_path_canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_static(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pageserve-st-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("js")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_asset_with_mime() {
        let dir = fixture_static("mime");
        std::fs::write(dir.join("js/world.js"), "export {};").unwrap();

        let (content, content_type) =
            load_asset(dir.to_str().unwrap(), "/static/js/world.js", "/static")
                .await
                .unwrap();
        assert_eq!(content, b"export {};");
        assert_eq!(content_type, "application/javascript");
    }

    #[tokio::test]
    async fn test_missing_asset_is_none() {
        let dir = fixture_static("missing");
        assert!(
            load_asset(dir.to_str().unwrap(), "/static/js/nope.js", "/static")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_traversal_is_blocked() {
        let dir = fixture_static("traversal");
        // A file outside the static dir that must never be reachable
        let secret = dir.parent().unwrap().join("pageserve-secret.txt");
        std::fs::write(&secret, "secret").unwrap();

        assert!(load_asset(
            dir.to_str().unwrap(),
            "/static/../pageserve-secret.txt",
            "/static"
        )
        .await
        .is_none());
    }

    #[tokio::test]
    async fn test_bare_prefix_is_none() {
        let dir = fixture_static("bare");
        assert!(load_asset(dir.to_str().unwrap(), "/static", "/static")
            .await
            .is_none());
        assert!(load_asset(dir.to_str().unwrap(), "/static/", "/static")
            .await
            .is_none());
    }
}
