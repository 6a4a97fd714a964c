//! Domain-specific error types and error handling.

use thiserror::Error;

use crate::domain::request::OtpChannel;

/// Errors surfaced by the OTP subsystem
///
/// Validation failure is deliberately not represented here: a wrong,
/// expired, or never-issued code is a normal negative result
/// (`Ok(false)`), never an error.
#[derive(Error, Debug)]
pub enum OtpError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("No sender registered for channel: {channel}")]
    UnsupportedChannel { channel: OtpChannel },

    #[error("Duplicate sender registered for channel: {channel}")]
    DuplicateSender { channel: OtpChannel },

    #[error("Delivery failed: {message}")]
    DeliveryFailed { message: String },

    #[error("Store error: {message}")]
    Store { message: String },
}

pub type OtpResult<T> = Result<T, OtpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = OtpError::UnsupportedChannel {
            channel: OtpChannel::Sms,
        };
        assert_eq!(err.to_string(), "No sender registered for channel: SMS");

        let err = OtpError::InvalidRequest {
            message: "destination must not be empty".to_string(),
        };
        assert!(err.to_string().contains("destination must not be empty"));
    }
}
