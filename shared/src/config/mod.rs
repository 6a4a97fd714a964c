//! Configuration module with per-concern sub-modules
//!
//! Each sub-module owns one external dependency's settings:
//! - `cache` - Redis connection configuration for the code store
//! - `email` - SMTP relay configuration for the EMAIL channel
//! - `sms` - HTTP gateway configuration for the SMS channel
//!
//! Every config struct provides sensible `Default`s for local development
//! and a `from_env()` constructor for deployment.

pub mod cache;
pub mod email;
pub mod sms;

pub use cache::CacheConfig;
pub use email::SmtpConfig;
pub use sms::SmsGatewayConfig;
