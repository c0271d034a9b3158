pub mod health;
pub mod options;

use axum::{
    routing::{get, post},
    Router,
};

use crate::planner::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/options", get(options::options_handler))
        // Plans
        .route("/api/v1/plans/generate", post(handlers::handle_generate_plan))
        .route("/api/v1/plans/swap", post(handlers::handle_swap_dish))
        // Dishes
        .route(
            "/api/v1/dishes/alternative",
            post(handlers::handle_alternative_dish),
        )
        .route("/api/v1/dishes/search", post(handlers::handle_search_dishes))
        .with_state(state)
}
