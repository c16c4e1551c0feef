pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::announcements::handlers as announcement_handlers;
use crate::render::handlers as render_handlers;
use crate::seo::handlers as seo_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Render API
        .route("/api/v1/render", post(render_handlers::handle_render))
        .route(
            "/api/v1/generators",
            get(render_handlers::handle_list_generators),
        )
        .route("/api/v1/tokens", get(render_handlers::handle_list_tokens))
        // SEO API
        .route("/api/v1/seo/resolve", post(seo_handlers::handle_resolve_seo))
        .route(
            "/api/v1/seo/:content_item_id/network",
            get(seo_handlers::handle_network_seo),
        )
        // Announcements API
        .route(
            "/api/v1/announcements/select",
            post(announcement_handlers::handle_select_announcements),
        )
        .with_state(state)
}
