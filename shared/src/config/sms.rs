//! SMS gateway configuration for the SMS delivery channel

use serde::{Deserialize, Serialize};

/// HTTP SMS gateway configuration
///
/// The gateway is expected to accept an authenticated JSON POST with the
/// recipient number and message body, returning a message identifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsGatewayConfig {
    /// Gateway endpoint URL
    pub endpoint: String,

    /// API key (basic-auth username)
    pub api_key: String,

    /// API secret (basic-auth password)
    pub api_secret: String,

    /// From number or alphanumeric sender id
    pub from_number: String,

    /// Maximum retry attempts for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial retry delay in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Timeout for gateway requests in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for SmsGatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://localhost/sms/send"),
            api_key: String::new(),
            api_secret: String::new(),
            from_number: String::from("+1234567890"),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SmsGatewayConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("SMS_GATEWAY_ENDPOINT")
                .unwrap_or_else(|_| "https://localhost/sms/send".to_string()),
            api_key: std::env::var("SMS_GATEWAY_API_KEY").unwrap_or_default(),
            api_secret: std::env::var("SMS_GATEWAY_API_SECRET").unwrap_or_default(),
            from_number: std::env::var("SMS_GATEWAY_FROM_NUMBER")
                .unwrap_or_else(|_| "+1234567890".to_string()),
            max_retries: std::env::var("SMS_GATEWAY_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_max_retries),
            retry_delay_ms: std::env::var("SMS_GATEWAY_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_retry_delay_ms),
            request_timeout_secs: std::env::var("SMS_GATEWAY_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_request_timeout_secs),
        }
    }
}
