use anyhow::Result;
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

/// Twilio credentials. All three values are required together; any missing
/// one disables real sending for the whole process.
#[derive(Debug, Clone)]
pub struct TwilioSettings {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // OpenAI completion provider
    pub openai_api_key: Option<String>,
    pub openai_timeout_seconds: u64,

    // Twilio SMS provider
    pub twilio: Option<TwilioSettings>,
    pub sms_timeout_seconds: u64,

    // Contact storage
    pub data_dir: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // OpenAI. The key is optional at startup; /ai/insights reports a
        // configuration error per request when it is absent.
        let openai_api_key = env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty());
        let openai_timeout_seconds = env::var("OPENAI_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        // Twilio
        let twilio = match (
            env::var("TWILIO_ACCOUNT_SID").ok().filter(|s| !s.is_empty()),
            env::var("TWILIO_AUTH_TOKEN").ok().filter(|s| !s.is_empty()),
            env::var("TWILIO_FROM_NUMBER").ok().filter(|s| !s.is_empty()),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(TwilioSettings {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };
        let sms_timeout_seconds = env::var("SMS_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(15);

        // Contact storage
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        Ok(Settings {
            env,
            server_addr,
            cors_allow_origins,
            openai_api_key,
            openai_timeout_seconds,
            twilio,
            sms_timeout_seconds,
            data_dir,
        })
    }
}
