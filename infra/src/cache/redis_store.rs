//! Redis-backed OTP store
//!
//! Implements the core store seam on Redis. The correctness-critical
//! operations map to native atomic primitives: `put_if_absent` is
//! `SET NX EX` and `consume_if_matches` is a server-side
//! compare-and-delete script, so concurrent issuance and validation for
//! the same key are serialized by the server ("first writer wins",
//! "first correct validator wins").

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use otp_core::services::otp::{OtpKey, OtpStore};

use crate::cache::RedisClient;

/// Prefix for the per-key failed-attempt counters
const ATTEMPTS_PREFIX: &str = "otp:attempts";

/// OTP store backed by Redis
#[derive(Clone)]
pub struct RedisOtpStore {
    /// Redis client for cache operations
    client: RedisClient,
}

impl RedisOtpStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Key of the failed-attempt counter paired with a code key
    ///
    /// `otp:{triple}` maps to `otp:attempts:{triple}`.
    fn attempts_key(key: &OtpKey) -> String {
        match key.as_str().strip_prefix("otp:") {
            Some(rest) => format!("{ATTEMPTS_PREFIX}:{rest}"),
            None => format!("{ATTEMPTS_PREFIX}:{}", key.as_str()),
        }
    }

    fn ttl_seconds(ttl: Duration) -> u64 {
        ttl.as_secs().max(1)
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn peek(&self, key: &OtpKey) -> Result<Option<String>, String> {
        self.client
            .get(key.as_str())
            .await
            .map_err(|e| e.to_string())
    }

    async fn put(&self, key: &OtpKey, code: &str, ttl: Duration) -> Result<(), String> {
        self.client
            .set_with_expiry(key.as_str(), code, Self::ttl_seconds(ttl))
            .await
            .map_err(|e| e.to_string())?;

        // A fresh code starts with a clean attempt counter
        let _ = self.client.delete(&Self::attempts_key(key)).await;
        Ok(())
    }

    async fn put_if_absent(
        &self,
        key: &OtpKey,
        code: &str,
        ttl: Duration,
    ) -> Result<bool, String> {
        let stored = self
            .client
            .set_if_absent_with_expiry(key.as_str(), code, Self::ttl_seconds(ttl))
            .await
            .map_err(|e| e.to_string())?;

        if stored {
            debug!(key = %key, "Stored new code");
            let _ = self.client.delete(&Self::attempts_key(key)).await;
        }
        Ok(stored)
    }

    async fn consume_if_matches(&self, key: &OtpKey, candidate: &str) -> Result<bool, String> {
        self.client
            .compare_and_delete(key.as_str(), candidate)
            .await
            .map_err(|e| e.to_string())
    }

    async fn delete(&self, key: &OtpKey) -> Result<bool, String> {
        self.client
            .delete(key.as_str())
            .await
            .map_err(|e| e.to_string())
    }

    async fn record_failed_attempt(&self, key: &OtpKey, ttl: Duration) -> Result<i64, String> {
        self.client
            .increment(&Self::attempts_key(key), Some(Self::ttl_seconds(ttl)))
            .await
            .map_err(|e| e.to_string())
    }

    async fn failed_attempts(&self, key: &OtpKey) -> Result<i64, String> {
        let count = self
            .client
            .get(&Self::attempts_key(key))
            .await
            .map_err(|e| e.to_string())?;

        Ok(count.and_then(|c| c.parse::<i64>().ok()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otp_core::domain::request::{OtpChannel, OtpPurpose};

    #[test]
    fn test_attempts_key_mirrors_code_key() {
        let key = OtpKey::new("+905551112233", OtpPurpose::PhoneVerify, OtpChannel::Sms);
        assert_eq!(
            RedisOtpStore::attempts_key(&key),
            "otp:attempts:+905551112233:PHONE_VERIFY:SMS"
        );
    }

    #[test]
    fn test_ttl_floor_is_one_second() {
        assert_eq!(RedisOtpStore::ttl_seconds(Duration::from_millis(100)), 1);
        assert_eq!(RedisOtpStore::ttl_seconds(Duration::from_secs(480)), 480);
    }
}
