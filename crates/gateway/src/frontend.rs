//! The embedded research UI.
//!
//! One page: a question form, a status banner reflecting `/api/status`, the
//! rendered report with its sub-question list, and a plain-text download
//! button. The assets are compiled in with `include_str!` so the gateway
//! ships as a single binary with no asset directory to deploy.

use axum::{
    Router,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};

const INDEX_HTML: &str = include_str!("../../../frontend/index.html");
const STYLE_CSS: &str = include_str!("../../../frontend/style.css");
const APP_JS: &str = include_str!("../../../frontend/app.js");

/// Routes for the research UI, merged into the main gateway router.
pub fn frontend_router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/style.css", get(stylesheet))
        .route("/static/app.js", get(app_js))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn stylesheet() -> Response {
    asset("text/css; charset=utf-8", STYLE_CSS)
}

async fn app_js() -> Response {
    asset("application/javascript; charset=utf-8", APP_JS)
}

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
}
