//! Insight aggregation and the OpenAI chat-completions client.
//!
//! Aggregates a request's health logs and cycle records into a short prompt
//! (kept concise to limit token usage) and forwards it to the completion
//! provider in a single synchronous call. No caching, no retries.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::domain::health::{Cycle, HealthLog};
use crate::error::ApiError;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 450;
const TEMPERATURE: f64 = 0.7;

/// Build the insights prompt from aggregated log and cycle data.
///
/// Average lines appear only when at least one log exists; the notes block
/// keeps the last five non-empty notes in their original order.
pub fn build_prompt(logs: &[HealthLog], cycles: &[Cycle]) -> String {
    let total_logs = logs.len();

    let mut lines = vec![
        "You are a health insights assistant.".to_string(),
        format!("Total logs: {}", total_logs),
    ];

    if total_logs > 0 {
        let n = total_logs as f64;
        let avg_mood = logs.iter().map(|l| l.mood as f64).sum::<f64>() / n;
        let avg_energy = logs.iter().map(|l| l.energy as f64).sum::<f64>() / n;
        let avg_pain = logs.iter().map(|l| l.pain_intensity as f64).sum::<f64>() / n;
        lines.push(format!("Average mood: {:.2}", avg_mood));
        lines.push(format!("Average energy: {:.2}", avg_energy));
        lines.push(format!("Average pain: {:.2}", avg_pain));
    }

    let recent_notes: Vec<&str> = logs
        .iter()
        .filter(|l| !l.notes.is_empty())
        .map(|l| l.notes.as_str())
        .collect();
    if !recent_notes.is_empty() {
        lines.push("Recent notes: ".to_string());
        let skip = recent_notes.len().saturating_sub(5);
        lines.extend(recent_notes[skip..].iter().map(|n| format!("- {}", n)));
    }

    if !cycles.is_empty() {
        let avg_cycle_len =
            cycles.iter().map(|c| c.cycle_length as f64).sum::<f64>() / cycles.len() as f64;
        lines.push(format!(
            "Average cycle length (records): {:.1} days",
            avg_cycle_len
        ));
    }

    lines.push(
        "Provide 3 concise personalized insights and 3 practical suggestions for self-care and safety."
            .to_string(),
    );

    lines.join("\n")
}

/// Client for the OpenAI chat-completions API.
#[derive(Clone)]
pub struct InsightClient {
    client: Client,
    url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl InsightClient {
    /// Create a new completion-provider client.
    pub fn new(api_key: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: CHAT_COMPLETIONS_URL.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Send one completion request and extract the generated text.
    ///
    /// Any non-200 status or unexpected body shape is an upstream error.
    pub async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({
            "model": MODEL,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        debug!(url = %self.url, prompt_len = prompt.len(), "Completion request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Completion request failed");
                ApiError::Upstream(format!("AI API error: {}", e))
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, "Completion provider returned an error");
            return Err(ApiError::Upstream(format!("AI API error: {}", text)));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse completion response");
            ApiError::Upstream("Unexpected AI response".to_string())
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ApiError::Upstream("Unexpected AI response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(mood: i64, energy: i64, pain: i64, notes: &str) -> HealthLog {
        HealthLog {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            mood,
            energy,
            pain_intensity: pain,
            pain_location: String::new(),
            notes: notes.to_string(),
        }
    }

    fn cycle(len: i64) -> Cycle {
        Cycle {
            id: None,
            last_period_date: "2024-01-01".to_string(),
            cycle_length: len,
            period_length: 5,
        }
    }

    #[test]
    fn empty_logs_omit_average_lines() {
        let prompt = build_prompt(&[], &[]);
        assert!(prompt.starts_with("You are a health insights assistant.\nTotal logs: 0"));
        assert!(!prompt.contains("Average mood"));
        assert!(!prompt.contains("Average energy"));
        assert!(!prompt.contains("Average pain"));
        assert!(!prompt.contains("Recent notes"));
        assert!(!prompt.contains("cycle length"));
        assert!(prompt.ends_with(
            "Provide 3 concise personalized insights and 3 practical suggestions for self-care and safety."
        ));
    }

    #[test]
    fn averages_are_exact_at_two_decimals() {
        let logs = vec![log(3, 7, 1, ""), log(4, 8, 2, ""), log(5, 9, 2, "")];
        let prompt = build_prompt(&logs, &[]);
        assert!(prompt.contains("Total logs: 3"));
        assert!(prompt.contains("Average mood: 4.00"));
        assert!(prompt.contains("Average energy: 8.00"));
        assert!(prompt.contains("Average pain: 1.67"));
    }

    #[test]
    fn notes_capped_at_last_five_in_order() {
        let logs: Vec<HealthLog> = (1..=7)
            .map(|i| log(5, 5, 0, &format!("note {}", i)))
            .collect();
        let prompt = build_prompt(&logs, &[]);
        assert!(!prompt.contains("- note 1\n"));
        assert!(!prompt.contains("- note 2\n"));
        let expected = "Recent notes: \n- note 3\n- note 4\n- note 5\n- note 6\n- note 7";
        assert!(prompt.contains(expected), "prompt was: {}", prompt);
    }

    #[test]
    fn empty_notes_are_skipped() {
        let logs = vec![log(5, 5, 0, ""), log(5, 5, 0, "only note"), log(5, 5, 0, "")];
        let prompt = build_prompt(&logs, &[]);
        assert!(prompt.contains("Recent notes: \n- only note"));
    }

    #[test]
    fn cycle_average_rendered_at_one_decimal() {
        let prompt = build_prompt(&[], &[cycle(28), cycle(29)]);
        assert!(prompt.contains("Average cycle length (records): 28.5 days"));
    }
}
