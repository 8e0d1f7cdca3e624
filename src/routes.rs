use crate::{handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Creates the Axum router and associates routes with handlers.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/jokes", get(handlers::list_jokes).post(handlers::create_joke))
        .route("/jokes/random", get(handlers::random_joke))
        .route("/jokes/author/{author}", get(handlers::list_jokes_by_author))
        .route("/jokes/{id}", get(handlers::get_joke).delete(handlers::delete_joke))
        // Middleware Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
