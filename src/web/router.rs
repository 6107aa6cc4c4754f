use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::{handlers, state::AppState};

pub const API_PREFIX: &str = "/api";
pub const UPLOADS_PREFIX: &str = "/uploads";

pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.service.images().dir());
    let body_limit = state.max_upload_bytes;

    let api = Router::new()
        .route("/health", get(handlers::healthcheck))
        .route(
            "/superheroes",
            get(handlers::list_superheroes).post(handlers::create_superhero),
        )
        .route(
            "/superheroes/:id",
            put(handlers::update_superhero).delete(handlers::delete_superhero),
        )
        .route("/superheroes/:id/images", post(handlers::upload_images))
        .route(
            "/superheroes/:id/images/:file_ref",
            delete(handlers::delete_image),
        );

    Router::new()
        .nest(API_PREFIX, api)
        .nest_service(UPLOADS_PREFIX, uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
