//! AI insights endpoint.
//!
//! Aggregates the submitted logs and cycles into a prompt and forwards it
//! to the completion provider in a single call. Stateless; nothing from the
//! request is persisted.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::app::AppState;
use crate::domain::health::{InsightsRequest, InsightsResponse};
use crate::error::{ApiError, ApiResult};
use crate::services::insights::build_prompt;

/// Generate personalized insights from health logs and cycle records.
///
/// POST /ai/insights
pub async fn generate_insights(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InsightsRequest>,
) -> ApiResult<Json<InsightsResponse>> {
    let client = state
        .insights
        .as_ref()
        .ok_or_else(|| ApiError::Config("OPENAI_API_KEY not set on server".to_string()))?;

    let prompt = build_prompt(&req.logs, &req.cycles);
    tracing::debug!(
        logs = req.logs.len(),
        cycles = req.cycles.len(),
        "Generating insights"
    );

    let insights = client.generate(&prompt).await?;

    Ok(Json(InsightsResponse { insights }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, Settings};
    use crate::domain::contacts::Contact;
    use crate::error::ApiError;
    use crate::services::{AlertSender, ContactStore, SimulatedSender};
    use async_trait::async_trait;

    struct NoopStore;

    #[async_trait]
    impl ContactStore for NoopStore {
        async fn read_all(&self, _uid: &str) -> Result<Vec<Contact>, ApiError> {
            Ok(Vec::new())
        }
        async fn write_all(&self, _uid: &str, contacts: &[Contact]) -> Result<usize, ApiError> {
            Ok(contacts.len())
        }
    }

    fn settings() -> Settings {
        Settings {
            env: Environment::Dev,
            server_addr: "127.0.0.1:0".to_string(),
            cors_allow_origins: vec![],
            openai_api_key: None,
            openai_timeout_seconds: 30,
            twilio: None,
            sms_timeout_seconds: 15,
            data_dir: "data".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_api_key_is_a_config_error_with_no_outbound_call() {
        let sender: Arc<dyn AlertSender> = Arc::new(SimulatedSender);
        let store: Arc<dyn ContactStore> = Arc::new(NoopStore);
        let state = AppState::new(settings(), None, sender, store);

        let req = InsightsRequest {
            logs: vec![],
            cycles: vec![],
        };
        let err = generate_insights(State(state), Json(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
