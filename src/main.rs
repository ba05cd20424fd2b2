mod app;
mod config;
mod domain;
mod error;
mod logging;
mod middleware;
mod routes;
mod services;

use anyhow::Result;
use std::sync::Arc;

use services::{AlertSender, ContactStore, FileContactStore, InsightClient, SimulatedSender, TwilioSender};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting Flowra backend"
    );

    // Completion-provider client, when a key is configured
    let insights = match settings.openai_api_key.as_deref() {
        Some(key) => Some(InsightClient::new(key, settings.openai_timeout_seconds)?),
        None => {
            tracing::warn!("OPENAI_API_KEY not set - /ai/insights will return a configuration error");
            None
        }
    };

    // Alert sender: real Twilio client only when all credentials are present
    let alert_sender: Arc<dyn AlertSender> = match settings.twilio.clone() {
        Some(twilio) => {
            tracing::info!(from = %twilio.from_number, "SMS sending enabled");
            Arc::new(TwilioSender::new(twilio, settings.sms_timeout_seconds)?)
        }
        None => {
            tracing::warn!("Twilio credentials not set - SOS sends will be simulated");
            Arc::new(SimulatedSender)
        }
    };

    // Contact store
    let contact_store = FileContactStore::new(&settings.data_dir);
    if let Err(e) = contact_store.ensure_dir().await {
        anyhow::bail!("Failed to prepare data directory: {}", e);
    }
    let contact_store: Arc<dyn ContactStore> = Arc::new(contact_store);

    // Create application state
    let state = app::AppState::new(settings.clone(), insights, alert_sender, contact_store);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
