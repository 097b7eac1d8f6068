//! HTTP router and handlers.

use crate::{app::AppState, storage::PUBLIC_PREFIX};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub mod files;
pub mod uploads;

/// Assemble the HTTP router with all routes.
pub fn build_router(state: AppState) -> Router {
    build_router_with_body_limit(state, uploads::MAX_REQUEST_BYTES)
}

/// Same routes with a custom request body limit in bytes.
pub fn build_router_with_body_limit(state: AppState, body_limit: usize) -> Router {
    let stored_files = ServeDir::new(&state.upload_dir);
    Router::new()
        .route("/api/applications/upload", post(uploads::upload_files))
        .route("/api/applications/:id/files", get(files::list_files))
        .route("/api/files/:file_id", delete(files::delete_file))
        .nest_service(PUBLIC_PREFIX, stored_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
