//! # Otpkit Infrastructure
//!
//! Concrete implementations behind the core seams:
//! - **Cache**: Redis-backed OTP store with atomic conditional
//!   primitives, plus a single-process in-memory store
//! - **Senders**: SMTP email sender, HTTP SMS-gateway sender, and a
//!   mock sender for development and testing

/// Cache module - Redis client and OTP store implementations
pub mod cache;

/// Senders module - delivery channel implementations
pub mod senders;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use otp_shared::config::{CacheConfig, SmsGatewayConfig, SmtpConfig};

/// Infrastructure configuration settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfrastructureConfig {
    /// Redis cache configuration
    pub cache: CacheConfig,
    /// SMTP relay configuration
    pub smtp: SmtpConfig,
    /// SMS gateway configuration
    pub sms: SmsGatewayConfig,
}

/// Load infrastructure configuration from the environment
///
/// Reads a `.env` file when present, then builds each per-concern
/// config from process environment variables.
pub fn load_config() -> InfrastructureConfig {
    dotenvy::dotenv().ok();

    InfrastructureConfig {
        cache: CacheConfig::from_env(),
        smtp: SmtpConfig::from_env(),
        sms: SmsGatewayConfig::from_env(),
    }
}

/// Infrastructure-specific error types
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for the SMS gateway
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// SMTP transport error
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Email message construction error
    #[error("Email error: {0}")]
    Email(String),

    /// SMS gateway error
    #[error("SMS gateway error: {0}")]
    Sms(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
