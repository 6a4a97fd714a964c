//! SMTP configuration for the EMAIL delivery channel

use serde::{Deserialize, Serialize};

/// SMTP relay configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    /// SMTP relay hostname
    pub smtp_host: String,

    /// SMTP relay port
    pub smtp_port: u16,

    /// Relay username
    pub username: String,

    /// Relay password
    pub password: String,

    /// From address placed on outgoing mail
    pub from_email: String,

    /// Display name placed on outgoing mail
    pub from_name: String,

    /// Use STARTTLS when connecting to the relay
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,

    /// Transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_use_tls() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::from("localhost"),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_email: String::from("no-reply@localhost"),
            from_name: String::from("Otpkit"),
            use_tls: default_use_tls(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SmtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
            password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_email: std::env::var("SMTP_FROM_EMAIL")
                .unwrap_or_else(|_| "no-reply@localhost".to_string()),
            from_name: std::env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Otpkit".to_string()),
            use_tls: std::env::var("SMTP_USE_TLS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            timeout_secs: std::env::var("SMTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}
