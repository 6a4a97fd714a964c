//! Configuration for the OTP service

use std::time::Duration;

/// Number of decimal digits in a generated code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Lifetime of a stored code in seconds (8 minutes)
pub const DEFAULT_TTL_SECONDS: u64 = 480;

/// Lifetime of the failed-attempt counter in seconds
pub const DEFAULT_ATTEMPT_WINDOW_SECONDS: u64 = 120;

/// Configuration for the OTP service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of decimal digits in a generated code
    pub code_length: usize,
    /// How long a stored code stays valid
    pub ttl: Duration,
    /// Optional cap on failed validation attempts per key. `None` means
    /// wrong guesses never lock out the live code.
    pub failed_attempt_limit: Option<u32>,
    /// How long the failed-attempt counter lives once created
    pub attempt_window: Duration,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
            failed_attempt_limit: None,
            attempt_window: Duration::from_secs(DEFAULT_ATTEMPT_WINDOW_SECONDS),
        }
    }
}
