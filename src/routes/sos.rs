//! Emergency alert endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::app::AppState;
use crate::domain::contacts::{SosRequest, SosResponse};
use crate::error::ApiResult;
use crate::services::sms::{default_message, dispatch_alerts};

/// Send an emergency alert to each of the supplied contacts.
///
/// POST /sos/:uid
///
/// The response always has status "ok"; delivery results are per contact.
pub async fn send_sos(
    Path(uid): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SosRequest>,
) -> ApiResult<Json<SosResponse>> {
    let body = match req.message {
        Some(ref message) if !message.is_empty() => message.clone(),
        _ => default_message(&uid),
    };

    tracing::info!(uid = %uid, contacts = req.contacts.len(), "Dispatching SOS alerts");
    let sent = dispatch_alerts(state.alert_sender.as_ref(), &req.contacts, &body).await;

    Ok(Json(SosResponse {
        status: "ok".to_string(),
        sent,
    }))
}
