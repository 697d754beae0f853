pub mod health;

use axum::{routing::get, Router};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/matching/users", get(handlers::handle_rank_users))
        .route(
            "/api/v1/matching/calculate/:user_id",
            get(handlers::handle_calculate_match),
        )
        .route(
            "/api/v1/matching/compatibility/:user_id/:other_user_id",
            get(handlers::handle_compatibility),
        )
        .with_state(state)
}
