//! Page route handler module
//!
//! Renders the template bound to a fixed page route into an HTML response.
//! Render failures are configuration errors: they become a 500 response
//! while the listener keeps serving.

use crate::config::AppState;
use crate::handler::router::{respond_conditional, RequestContext};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::sync::Arc;

/// Serve a fixed page route from its named template
pub async fn serve_page(
    ctx: &RequestContext<'_>,
    template_name: &str,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    match state.templates.render(template_name).await {
        Ok(content) => respond_conditional(ctx, content, "text/html; charset=utf-8"),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to render page '{}': {e}",
                ctx.path
            ));
            let detail = state.config.server.debug.then(|| e.to_string());
            http::build_500_response(detail.as_deref())
        }
    }
}
