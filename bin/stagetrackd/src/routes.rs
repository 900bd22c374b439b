//! Route registration — collects all module routes + system endpoints.

use axum::Router;
use axum::response::{Html, IntoResponse};
use axum::routing::get;

/// Build the complete router with all routes.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/version", get(version));

    // Mount each module's routes under /{module_name}.
    // Module routes are already Router<()> (they called .with_state() internally).
    for (name, router) in module_routes {
        app = app.nest(&format!("/{}", name), router);
    }

    app
}

/// The operator stage-move form.
async fn index_page() -> impl IntoResponse {
    Html(include_str!("web/index.html"))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "stagetrackd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
