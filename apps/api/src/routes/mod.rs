pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeFile;

use crate::assets::INFOGRAPHIC_ROUTE;
use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    let infographic = ServeFile::new(state.assets.path());

    Router::new()
        .route("/health", get(health::health_handler))
        .route_service(INFOGRAPHIC_ROUTE, infographic)
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/sessions/:sid/page", get(handlers::handle_get_page))
        .route(
            "/api/v1/sessions/:sid/navigation",
            post(handlers::handle_navigate),
        )
        // Sections
        .route(
            "/api/v1/sessions/:sid/sections",
            get(handlers::handle_list_sections).post(handlers::handle_add_section),
        )
        .route(
            "/api/v1/sessions/:sid/sections/:key",
            get(handlers::handle_get_section),
        )
        // Artefacts
        .route(
            "/api/v1/sessions/:sid/artifacts",
            get(handlers::handle_list_artifacts).post(handlers::handle_upload),
        )
        .route(
            "/api/v1/sessions/:sid/artifacts/:id",
            get(handlers::handle_get_artifact).delete(handlers::handle_remove_artifact),
        )
        .route(
            "/api/v1/sessions/:sid/artifacts/:id/download",
            get(handlers::handle_download),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
