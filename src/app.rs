use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::check_urls))
        .route("/clear_history", post(handlers::clear_history))
        .route("/metrics", get(handlers::show_metrics))
        .route("/metrics/*url", get(handlers::url_metrics))
        .route("/api/history", get(handlers::get_history))
        .route("/static/main.js", get(handlers::main_script))
        .with_state(state)
}
