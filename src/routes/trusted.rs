//! Trusted-contact endpoints.
//!
//! The stored file is the sole source of truth; a save replaces the whole
//! array. There is no per-contact update or merge.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::app::AppState;
use crate::domain::contacts::{Contact, SaveContactsResponse};
use crate::error::ApiResult;

/// Fetch a user's trusted contacts; empty if none were ever saved.
///
/// GET /trusted/:uid
pub async fn get_contacts(
    Path(uid): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Contact>>> {
    let contacts = state.contact_store.read_all(&uid).await?;
    Ok(Json(contacts))
}

/// Replace a user's trusted contacts with the submitted array.
///
/// POST /trusted/:uid
pub async fn save_contacts(
    Path(uid): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(contacts): Json<Vec<Contact>>,
) -> ApiResult<Json<SaveContactsResponse>> {
    let count = state.contact_store.write_all(&uid, &contacts).await?;
    tracing::info!(uid = %uid, count = count, "Trusted contacts saved");

    Ok(Json(SaveContactsResponse {
        status: "ok".to_string(),
        count,
    }))
}
