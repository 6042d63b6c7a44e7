//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup and cached in memory; handlers only
//! ever see the immutable `Config` inside `AppState`.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL for CORS and cookies
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Fixed UTC offset (minutes) used for calendar-day bucketing.
    /// Streaks, daily analytics series and month scoping all use this offset.
    pub utc_offset_minutes: i32,
    /// Default region for environmental signal lookups
    pub default_region: String,
    /// Use live environmental signals when estimating impacts
    pub enhanced_estimates: bool,
    /// Carbon intensity API base URL
    pub carbon_api_url: String,
    /// Fuel price API base URL (None: use reference prices)
    pub fuel_api_url: Option<String>,
    /// Timeout for outbound signal/AI requests, in seconds
    pub http_timeout_secs: u64,
    /// AI suggestion gateway endpoint
    pub ai_gateway_url: String,
    /// Model identifier passed to the AI gateway
    pub ai_model: String,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// AI gateway API key (None: suggestions endpoint is disabled)
    pub ai_api_key: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            utc_offset_minutes: 330,
            default_region: "IN".to_string(),
            enhanced_estimates: false,
            carbon_api_url: "https://api.carbonintensity.org.uk".to_string(),
            fuel_api_url: None,
            http_timeout_secs: 5,
            ai_gateway_url: "https://ai.gateway.lovable.dev/v1/chat/completions".to_string(),
            ai_model: "google/gemini-2.5-flash".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            ai_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In production the secrets arrive as env vars via Cloud Run secret
    /// bindings; locally a `.env` file works the same way.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            utc_offset_minutes: env::var("APP_UTC_OFFSET_MINUTES")
                .unwrap_or_else(|_| "330".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("APP_UTC_OFFSET_MINUTES"))?,
            default_region: env::var("DEFAULT_REGION").unwrap_or_else(|_| "IN".to_string()),
            enhanced_estimates: env::var("ENHANCED_ESTIMATES")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            carbon_api_url: env::var("CARBON_API_URL")
                .unwrap_or_else(|_| "https://api.carbonintensity.org.uk".to_string()),
            fuel_api_url: env::var("FUEL_API_URL").ok().filter(|v| !v.is_empty()),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("HTTP_TIMEOUT_SECS"))?,
            ai_gateway_url: env::var("AI_GATEWAY_URL").unwrap_or_else(|_| {
                "https://ai.gateway.lovable.dev/v1/chat/completions".to_string()
            }),
            ai_model: env::var("AI_MODEL")
                .unwrap_or_else(|_| "google/gemini-2.5-flash".to_string()),

            // Secrets - from env for local dev, secret bindings in prod
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            ai_api_key: env::var("AI_GATEWAY_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    /// The fixed application offset as a chrono type.
    pub fn app_offset(&self) -> chrono::FixedOffset {
        use chrono::Offset;
        // Out-of-range offsets fall back to UTC rather than panicking at startup.
        chrono::FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| chrono::Utc.fix())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Malformed environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 8080);
        assert_eq!(config.utc_offset_minutes, 330);
        assert!(!config.enhanced_estimates);
    }

    #[test]
    fn test_app_offset() {
        let config = Config {
            utc_offset_minutes: 330,
            ..Config::default()
        };
        assert_eq!(config.app_offset().local_minus_utc(), 330 * 60);
    }
}
