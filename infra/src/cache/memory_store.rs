//! In-memory OTP store
//!
//! Single-process fallback for deployments without a shared expiring
//! store, and the store used by the integration tests. Every operation
//! runs under one mutex, which makes the conditional primitives atomic
//! by construction - but only within this process. Multi-process
//! deployments need the Redis store for the single-active-code and
//! single-use invariants to hold globally.
//!
//! Expiry is lazy: entries are dropped when an operation touches them
//! past their deadline. Deadlines use `tokio::time::Instant`, so paused
//! test clocks can drive expiry deterministically.

use async_trait::async_trait;
use constant_time_eq::constant_time_eq;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use otp_core::services::otp::{OtpKey, OtpStore};

struct CodeEntry {
    code: String,
    expires_at: Instant,
}

struct AttemptEntry {
    count: i64,
    expires_at: Instant,
}

#[derive(Default)]
struct Inner {
    codes: HashMap<String, CodeEntry>,
    attempts: HashMap<String, AttemptEntry>,
}

/// OTP store held entirely in process memory
#[derive(Default)]
pub struct MemoryOtpStore {
    inner: Mutex<Inner>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, String> {
        self.inner
            .lock()
            .map_err(|_| "memory store mutex poisoned".to_string())
    }

    /// Drop the entry for `key` if its deadline has passed
    fn purge_expired(inner: &mut Inner, key: &str, now: Instant) {
        if let Some(entry) = inner.codes.get(key) {
            if entry.expires_at <= now {
                inner.codes.remove(key);
            }
        }
        if let Some(entry) = inner.attempts.get(key) {
            if entry.expires_at <= now {
                inner.attempts.remove(key);
            }
        }
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn peek(&self, key: &OtpKey) -> Result<Option<String>, String> {
        let mut inner = self.lock()?;
        Self::purge_expired(&mut inner, key.as_str(), Instant::now());
        Ok(inner.codes.get(key.as_str()).map(|e| e.code.clone()))
    }

    async fn put(&self, key: &OtpKey, code: &str, ttl: Duration) -> Result<(), String> {
        let mut inner = self.lock()?;
        inner.codes.insert(
            key.as_str().to_string(),
            CodeEntry {
                code: code.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        inner.attempts.remove(key.as_str());
        Ok(())
    }

    async fn put_if_absent(
        &self,
        key: &OtpKey,
        code: &str,
        ttl: Duration,
    ) -> Result<bool, String> {
        let mut inner = self.lock()?;
        let now = Instant::now();
        Self::purge_expired(&mut inner, key.as_str(), now);

        if inner.codes.contains_key(key.as_str()) {
            return Ok(false);
        }

        inner.codes.insert(
            key.as_str().to_string(),
            CodeEntry {
                code: code.to_string(),
                expires_at: now + ttl,
            },
        );
        inner.attempts.remove(key.as_str());
        Ok(true)
    }

    async fn consume_if_matches(&self, key: &OtpKey, candidate: &str) -> Result<bool, String> {
        let mut inner = self.lock()?;
        let now = Instant::now();
        Self::purge_expired(&mut inner, key.as_str(), now);

        let matched = match inner.codes.get(key.as_str()) {
            Some(entry) => {
                entry.code.len() == candidate.len()
                    && constant_time_eq(entry.code.as_bytes(), candidate.as_bytes())
            }
            None => false,
        };

        if matched {
            inner.codes.remove(key.as_str());
        }
        Ok(matched)
    }

    async fn delete(&self, key: &OtpKey) -> Result<bool, String> {
        let mut inner = self.lock()?;
        Self::purge_expired(&mut inner, key.as_str(), Instant::now());
        Ok(inner.codes.remove(key.as_str()).is_some())
    }

    async fn record_failed_attempt(&self, key: &OtpKey, ttl: Duration) -> Result<i64, String> {
        let mut inner = self.lock()?;
        let now = Instant::now();
        Self::purge_expired(&mut inner, key.as_str(), now);

        let entry = inner
            .attempts
            .entry(key.as_str().to_string())
            .or_insert(AttemptEntry {
                count: 0,
                expires_at: now + ttl,
            });
        entry.count += 1;
        Ok(entry.count)
    }

    async fn failed_attempts(&self, key: &OtpKey) -> Result<i64, String> {
        let mut inner = self.lock()?;
        Self::purge_expired(&mut inner, key.as_str(), Instant::now());
        Ok(inner
            .attempts
            .get(key.as_str())
            .map(|e| e.count)
            .unwrap_or(0))
    }
}
