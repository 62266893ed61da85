use std::{env, time::Duration};

use secrecy::SecretString;

pub const DEFAULT_MODEL_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;

/// `0` disables the timeout; unset or unparsable values use the default.
fn parse_timeout_secs(raw: Option<String>) -> Option<u64> {
    let Some(raw) = raw else {
        return Some(DEFAULT_GENERATION_TIMEOUT_SECS);
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => None,
        Ok(secs) => Some(secs),
        Err(_) => {
            log::warn!(
                "Ignoring invalid GENERATION_TIMEOUT_SECS '{}', using {}s",
                raw,
                DEFAULT_GENERATION_TIMEOUT_SECS
            );
            Some(DEFAULT_GENERATION_TIMEOUT_SECS)
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub model_api_base: String,
    pub model_api_key: SecretString,
    pub model_name: String,
    /// Per-call timeout for the generation provider. `None` disables it.
    pub generation_timeout_secs: Option<u64>,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            model_api_base: env::var("MODEL_API_BASE")
                .unwrap_or_else(|_| DEFAULT_MODEL_API_BASE.to_string()),
            model_api_key: SecretString::from(
                env::var("MODEL_API_KEY")
                    .or_else(|_| env::var("GEMINI_API_KEY"))
                    .unwrap_or_default(),
            ),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            generation_timeout_secs: parse_timeout_secs(env::var("GENERATION_TIMEOUT_SECS").ok()),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok(),
        }
    }

    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_secs.map(Duration::from_secs)
    }

    pub fn has_api_key(&self) -> bool {
        use secrecy::ExposeSecret;

        !self.model_api_key.expose_secret().trim().is_empty()
    }

    /// Validate that production-critical configuration is set
    /// Panics if the model credentials are missing
    pub fn validate_for_production(&self) {
        if !self.has_api_key() {
            panic!(
                "FATAL: MODEL_API_KEY is not set! Set MODEL_API_KEY (or GEMINI_API_KEY) to a valid provider key."
            );
        }

        if self.model_name.trim().is_empty() {
            panic!("FATAL: MODEL_NAME is empty! Unset it to use the default model.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            model_api_base: "http://localhost:9999/v1".to_string(),
            model_api_key: SecretString::from("test_model_api_key".to_string()),
            model_name: "test-model".to_string(),
            generation_timeout_secs: Some(5),
            cors_allowed_origin: None,
        }
    }
}
