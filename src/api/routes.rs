use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Dashboard pages
        .route("/", get(handlers::dashboard))
        .route("/embed", get(handlers::embed))
        .route("/pipeline", get(handlers::pipeline_page))
        .route("/style.css", get(handlers::style_css))
        .route("/app.js", get(handlers::app_js))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// JSON API under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(handlers::list_movies))
        .route("/movies/search", get(handlers::search_movies))
        .route("/recommendations", get(handlers::get_recommendations))
        .route("/analytics", get(handlers::get_analytics))
        .route("/manifold", get(handlers::get_manifold))
        .route("/evaluation", get(handlers::get_evaluation))
        .route("/posters/:id", get(handlers::get_poster))
        .route("/views/:view", get(handlers::view_fragment))
        .layer(CorsLayer::permissive())
}
