use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route("/api/clients/:client_id/foods", post(handlers::log_food))
        .route("/api/clients/:client_id/foods/:day_key", get(handlers::get_day))
        .route("/api/clients/:client_id/nutrition/week", get(handlers::get_week))
        .with_state(state)
}
