pub mod health;
pub mod insights;
pub mod sos;
pub mod trusted;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // AI insights
        .route("/ai/insights", post(insights::generate_insights))
        // Trusted contacts
        .route("/trusted/:uid", get(trusted::get_contacts))
        .route("/trusted/:uid", post(trusted::save_contacts))
        // Emergency alerts
        .route("/sos/:uid", post(sos::send_sos))
}
