use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/state", get(handlers::get_state))
        .route("/api/today", get(handlers::get_today))
        .route("/api/day/:date", get(handlers::get_day))
        .route("/api/logs", post(handlers::log_deed))
        .route("/api/deeds", get(handlers::list_deeds).post(handlers::create_deed))
        .route("/api/deeds/reorder", post(handlers::reorder_deeds))
        .route(
            "/api/deeds/:id",
            put(handlers::update_deed).delete(handlers::delete_deed),
        )
        .route("/api/suggested", get(handlers::list_suggested))
        .route("/api/suggested/:id", post(handlers::add_suggested))
        .route("/api/stats", get(handlers::get_stats))
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::put_settings),
        )
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
