//! Axum router configuration with middleware.
//!
//! All API routes are under `/api`. Middleware: CORS (fully open, the web
//! client may be served from any origin) and request tracing.
//!
//! The bundled web client is served from `web/` (configurable via
//! `ADDA_WEB_DIR`). API routes take priority; unknown paths fall through
//! to the client's `index.html`. If the directory does not exist, only
//! the API is served.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Completion (command interception, fallback chain, streaming)
        .route("/chat", post(handlers::chat::send_chat))
        // Chat records
        .route("/chats", post(handlers::record::upsert_chat))
        .route("/chats/{user_id}", get(handlers::record::list_chats))
        .route(
            "/chats/{user_id}/{chat_id}",
            get(handlers::record::get_chat),
        );

    let mut router = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Serve the web client from disk if the directory exists.
    let web_dir = std::env::var("ADDA_WEB_DIR").unwrap_or_else(|_| "web".to_string());
    if std::path::Path::new(&web_dir).exists() {
        let index_path = format!("{web_dir}/index.html");
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir, "Static file serving enabled");
    }

    router
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
