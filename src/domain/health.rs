//! Health-tracking wire models.
//!
//! Field names are camelCase to match the mobile client's payloads. All of
//! these are request-scoped; the service never persists a log or cycle.

use serde::{Deserialize, Serialize};

/// A single self-reported health log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthLog {
    pub timestamp: String,
    pub mood: i64,
    pub energy: i64,
    pub pain_intensity: i64,
    #[serde(default)]
    pub pain_location: String,
    #[serde(default)]
    pub notes: String,
}

/// A menstrual cycle record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    #[serde(default)]
    pub id: Option<String>,
    pub last_period_date: String,
    pub cycle_length: i64,
    pub period_length: i64,
}

/// Request body for POST /ai/insights.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsRequest {
    pub logs: Vec<HealthLog>,
    pub cycles: Vec<Cycle>,
}

/// Response body for POST /ai/insights.
#[derive(Debug, Clone, Serialize)]
pub struct InsightsResponse {
    pub insights: String,
}
