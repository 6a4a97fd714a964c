//! Canonical store keys and the expiring-store seam

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

use crate::domain::request::{OtpChannel, OtpPurpose};

/// Prefix shared by every OTP store key
const KEY_PREFIX: &str = "otp";

/// Canonical key addressing the live code for one
/// (destination, purpose, channel) triple
///
/// Format: `otp:{destination}:{PURPOSE}:{CHANNEL}`, e.g.
/// `otp:+905551112233:PHONE_VERIFY:SMS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtpKey(String);

impl OtpKey {
    /// Build the canonical key for a triple.
    ///
    /// Purpose and channel come from closed enums and never contain the
    /// `:` separator; a destination containing `:` cannot collide with a
    /// different triple because the two trailing components are fixed
    /// vocabularies and are always the last two segments.
    pub fn new(destination: &str, purpose: OtpPurpose, channel: OtpChannel) -> Self {
        Self(format!("{KEY_PREFIX}:{destination}:{purpose}:{channel}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Seam over the expiring key-value store holding live codes
///
/// `put_if_absent` and `consume_if_matches` are the correctness-critical
/// operations: they must be atomic with respect to concurrent callers of
/// the same key, closing the check-then-act races in issuance and
/// validation. Errors are opaque `String` payloads so this crate stays
/// free of transport error types; the coordinator wraps them into
/// `OtpError::Store`.
///
/// Implementations reset the failed-attempt counter for a key whenever a
/// new code is stored for it.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Non-destructive read of the live code
    async fn peek(&self, key: &OtpKey) -> Result<Option<String>, String>;

    /// Unconditional set with expiry
    async fn put(&self, key: &OtpKey, code: &str, ttl: Duration) -> Result<(), String>;

    /// Atomic set-if-absent with expiry; returns whether the write
    /// happened (`false` when a live value already exists)
    async fn put_if_absent(&self, key: &OtpKey, code: &str, ttl: Duration)
        -> Result<bool, String>;

    /// Atomic read-compare-delete; returns whether the candidate matched
    /// the live code (which is then gone)
    async fn consume_if_matches(&self, key: &OtpKey, candidate: &str) -> Result<bool, String>;

    /// Delete the live code; returns whether a value was removed
    async fn delete(&self, key: &OtpKey) -> Result<bool, String>;

    /// Increment the failed-attempt counter for the key, creating it
    /// with `ttl` on first increment; returns the new count
    async fn record_failed_attempt(&self, key: &OtpKey, ttl: Duration) -> Result<i64, String>;

    /// Current failed-attempt count for the key (0 when absent)
    async fn failed_attempts(&self, key: &OtpKey) -> Result<i64, String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_canonical_format() {
        let key = OtpKey::new("+905551112233", OtpPurpose::PhoneVerify, OtpChannel::Sms);
        assert_eq!(key.as_str(), "otp:+905551112233:PHONE_VERIFY:SMS");
    }

    #[test]
    fn test_distinct_triples_produce_distinct_keys() {
        let a = OtpKey::new("user@example.com", OtpPurpose::Login, OtpChannel::Email);
        let b = OtpKey::new("user@example.com", OtpPurpose::PasswordReset, OtpChannel::Email);
        let c = OtpKey::new("user@example.com", OtpPurpose::Login, OtpChannel::Sms);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_key_is_deterministic() {
        let a = OtpKey::new("+15551234567", OtpPurpose::Login, OtpChannel::Sms);
        let b = OtpKey::new("+15551234567", OtpPurpose::Login, OtpChannel::Sms);
        assert_eq!(a, b);
    }
}
