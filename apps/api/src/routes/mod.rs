pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/ai-feedback", post(handlers::handle_ai_feedback));

    if state.config.enable_debug_echo {
        router = router.route("/api/debug-echo", post(handlers::handle_debug_echo));
    }

    router.with_state(state)
}
