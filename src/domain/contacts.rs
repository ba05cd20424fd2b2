//! Trusted-contact and SOS wire models.

use serde::{Deserialize, Serialize};

/// A trusted contact as stored in the per-user contact file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub relation: Option<String>,
    #[serde(default)]
    pub trusted: bool,
}

/// Request body for POST /sos/:uid.
#[derive(Debug, Clone, Deserialize)]
pub struct SosRequest {
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Delivery status for one contact: the provider's HTTP status code for a
/// real send, or the `"simulated"` sentinel when no credentials are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SendStatus {
    Code(u16),
    Sentinel(String),
}

impl SendStatus {
    pub fn simulated() -> Self {
        Self::Sentinel("simulated".to_string())
    }
}

/// Per-contact delivery record returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOutcome {
    pub to: String,
    pub status: SendStatus,
}

/// Response body for POST /sos/:uid.
#[derive(Debug, Clone, Serialize)]
pub struct SosResponse {
    pub status: String,
    pub sent: Vec<SendOutcome>,
}

/// Response body for POST /trusted/:uid.
#[derive(Debug, Clone, Serialize)]
pub struct SaveContactsResponse {
    pub status: String,
    pub count: usize,
}
