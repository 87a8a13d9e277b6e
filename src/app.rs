use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/auth/login", get(handlers::login))
        .route("/oauth/callback", get(handlers::oauth_callback))
        .route("/account/reset", post(handlers::reset_account_form))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/history", get(handlers::get_history))
        .route("/api/history.csv", get(handlers::download_history))
        .route("/api/insights", post(handlers::create_insights))
        .route("/api/account/reset", post(handlers::reset_account))
        .with_state(state)
}
