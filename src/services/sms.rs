//! SOS alert delivery.
//!
//! The sender is a capability switch decided once at startup: a Twilio
//! client when all three credentials are configured, otherwise a simulated
//! sender that records a sentinel status and never touches the network.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::TwilioSettings;
use crate::domain::contacts::{Contact, SendOutcome, SendStatus};

/// Outbound message delivery for one phone number.
///
/// A send never returns an error: failures are captured in the recorded
/// status so one contact's failure cannot abort its siblings.
#[async_trait]
pub trait AlertSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> SendStatus;
}

/// Send one alert per contact, preserving input order.
///
/// Sends are independent; no batching, no retry, no aborting on failure.
pub async fn dispatch_alerts(
    sender: &dyn AlertSender,
    contacts: &[Contact],
    body: &str,
) -> Vec<SendOutcome> {
    let mut sent = Vec::with_capacity(contacts.len());
    for contact in contacts {
        let status = sender.send(&contact.phone, body).await;
        sent.push(SendOutcome {
            to: contact.phone.clone(),
            status,
        });
    }
    sent
}

/// The message used when the caller does not supply one.
pub fn default_message(uid: &str) -> String {
    format!("Emergency alert from Flowra user {}. Please check on them.", uid)
}

/// Real sender backed by the Twilio Messages REST endpoint.
pub struct TwilioSender {
    client: Client,
    settings: TwilioSettings,
}

impl TwilioSender {
    pub fn new(settings: TwilioSettings, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, settings })
    }
}

#[async_trait]
impl AlertSender for TwilioSender {
    async fn send(&self, to: &str, body: &str) -> SendStatus {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.settings.account_sid
        );

        let result = self
            .client
            .post(&url)
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .form(&[
                ("To", to),
                ("From", self.settings.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    warn!(to = to, status = %status, "SMS provider rejected send");
                }
                SendStatus::Code(status.as_u16())
            }
            Err(e) => {
                // Transport failure before any HTTP status; recorded as 0.
                warn!(to = to, error = %e, "SMS send failed");
                SendStatus::Code(0)
            }
        }
    }
}

/// Sender used when Twilio credentials are not configured.
pub struct SimulatedSender;

#[async_trait]
impl AlertSender for SimulatedSender {
    async fn send(&self, to: &str, _body: &str) -> SendStatus {
        debug!(to = to, "Simulated SMS send");
        SendStatus::simulated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn contact(phone: &str) -> Contact {
        Contact {
            id: None,
            name: "Test".to_string(),
            phone: phone.to_string(),
            relation: None,
            trusted: true,
        }
    }

    struct RecordingSender {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl AlertSender for RecordingSender {
        async fn send(&self, to: &str, body: &str) -> SendStatus {
            self.calls
                .lock()
                .unwrap()
                .push((to.to_string(), body.to_string()));
            SendStatus::Code(201)
        }
    }

    #[tokio::test]
    async fn simulated_sender_records_sentinel_for_every_contact() {
        let contacts = vec![contact("+1"), contact("+2"), contact("+3")];
        let sent = dispatch_alerts(&SimulatedSender, &contacts, "help").await;

        assert_eq!(sent.len(), 3);
        for outcome in &sent {
            assert_eq!(outcome.status, SendStatus::simulated());
        }
    }

    #[tokio::test]
    async fn one_send_per_contact_in_order() {
        let sender = RecordingSender {
            calls: Mutex::new(Vec::new()),
        };
        let contacts = vec![contact("+11"), contact("+22"), contact("+33")];

        let sent = dispatch_alerts(&sender, &contacts, "check in").await;

        let calls = sender.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls.iter().map(|(to, _)| to.as_str()).collect::<Vec<_>>(),
            vec!["+11", "+22", "+33"]
        );
        assert_eq!(
            sent.iter().map(|o| o.to.as_str()).collect::<Vec<_>>(),
            vec!["+11", "+22", "+33"]
        );
        assert!(sent.iter().all(|o| o.status == SendStatus::Code(201)));
    }

    #[test]
    fn default_message_names_the_user() {
        let msg = default_message("uid-9");
        assert!(msg.contains("uid-9"));
    }

    #[test]
    fn send_status_serializes_as_number_or_string() {
        let code = serde_json::to_value(SendStatus::Code(201)).unwrap();
        assert_eq!(code, serde_json::json!(201));
        let sim = serde_json::to_value(SendStatus::simulated()).unwrap();
        assert_eq!(sim, serde_json::json!("simulated"));
    }
}
