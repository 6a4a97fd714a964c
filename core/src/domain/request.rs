//! Request values for OTP issuance and validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The use-case an OTP is issued for.
///
/// The canonical form (used in store keys and on the wire) is
/// SCREAMING_SNAKE_CASE, e.g. `PASSWORD_RESET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpPurpose {
    Login,
    PasswordReset,
    PhoneVerify,
}

impl OtpPurpose {
    /// Canonical string form, as embedded in store keys
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Login => "LOGIN",
            OtpPurpose::PasswordReset => "PASSWORD_RESET",
            OtpPurpose::PhoneVerify => "PHONE_VERIFY",
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The delivery mechanism an OTP is transmitted through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpChannel {
    Email,
    Sms,
}

impl OtpChannel {
    /// Canonical string form, as embedded in store keys
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpChannel::Email => "EMAIL",
            OtpChannel::Sms => "SMS",
        }
    }
}

impl fmt::Display for OtpChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to issue and deliver a new OTP
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueRequest {
    /// Where to deliver the code (phone number, email address, ...)
    pub destination: String,
    /// What the code will be used for
    pub purpose: OtpPurpose,
    /// How the code is delivered
    pub channel: OtpChannel,
}

impl IssueRequest {
    pub fn new(destination: impl Into<String>, purpose: OtpPurpose, channel: OtpChannel) -> Self {
        Self {
            destination: destination.into(),
            purpose,
            channel,
        }
    }
}

/// Request to validate a caller-supplied OTP
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidateRequest {
    /// The destination the code was issued for
    pub destination: String,
    /// The code supplied by the caller
    pub candidate_code: String,
    /// The purpose the code was issued for
    pub purpose: OtpPurpose,
    /// The channel the code was issued through
    pub channel: OtpChannel,
}

impl ValidateRequest {
    pub fn new(
        destination: impl Into<String>,
        candidate_code: impl Into<String>,
        purpose: OtpPurpose,
        channel: OtpChannel,
    ) -> Self {
        Self {
            destination: destination.into(),
            candidate_code: candidate_code.into(),
            purpose,
            channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_canonical_form() {
        assert_eq!(OtpPurpose::Login.to_string(), "LOGIN");
        assert_eq!(OtpPurpose::PasswordReset.to_string(), "PASSWORD_RESET");
        assert_eq!(OtpPurpose::PhoneVerify.to_string(), "PHONE_VERIFY");
    }

    #[test]
    fn test_channel_canonical_form() {
        assert_eq!(OtpChannel::Email.to_string(), "EMAIL");
        assert_eq!(OtpChannel::Sms.to_string(), "SMS");
    }

    #[test]
    fn test_enums_deserialize_from_canonical_form() {
        let purpose: OtpPurpose = serde_json::from_str("\"PASSWORD_RESET\"").unwrap();
        assert_eq!(purpose, OtpPurpose::PasswordReset);

        let channel: OtpChannel = serde_json::from_str("\"SMS\"").unwrap();
        assert_eq!(channel, OtpChannel::Sms);
    }

    #[test]
    fn test_issue_request_deserialize() {
        let request: IssueRequest = serde_json::from_str(
            r#"{"destination": "+905551112233", "purpose": "PHONE_VERIFY", "channel": "SMS"}"#,
        )
        .unwrap();
        assert_eq!(request.destination, "+905551112233");
        assert_eq!(request.purpose, OtpPurpose::PhoneVerify);
        assert_eq!(request.channel, OtpChannel::Sms);
    }
}
