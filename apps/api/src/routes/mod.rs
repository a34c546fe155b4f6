pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/categories", get(handlers::handle_list_categories))
        .route("/api/v1/candidates", post(handlers::handle_ingest_candidate))
        .route(
            "/api/v1/candidates/batch",
            post(handlers::handle_ingest_batch),
        )
        .route(
            "/api/v1/candidates/:category",
            get(handlers::handle_fetch_partition),
        )
        .route("/api/v1/rank", post(handlers::handle_rank))
        .with_state(state)
}
