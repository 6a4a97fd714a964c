//! Mock implementations for testing the OTP service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::request::OtpChannel;
use crate::services::otp::{OtpKey, OtpSender, OtpStore};

// Mock store for testing; atomic by construction under one mutex
pub struct MockOtpStore {
    pub codes: Arc<Mutex<HashMap<String, String>>>,
    pub attempts: Arc<Mutex<HashMap<String, i64>>>,
    pub puts: Arc<AtomicU64>,
    pub deletes: Arc<AtomicU64>,
    pub should_fail: bool,
}

impl MockOtpStore {
    pub fn new(should_fail: bool) -> Self {
        Self {
            codes: Arc::new(Mutex::new(HashMap::new())),
            attempts: Arc::new(Mutex::new(HashMap::new())),
            puts: Arc::new(AtomicU64::new(0)),
            deletes: Arc::new(AtomicU64::new(0)),
            should_fail,
        }
    }

    pub fn write_count(&self) -> u64 {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn stored_code(&self, key: &OtpKey) -> Option<String> {
        self.codes.lock().unwrap().get(key.as_str()).cloned()
    }
}

#[async_trait]
impl OtpStore for MockOtpStore {
    async fn peek(&self, key: &OtpKey) -> Result<Option<String>, String> {
        if self.should_fail {
            return Err("store error".to_string());
        }
        Ok(self.codes.lock().unwrap().get(key.as_str()).cloned())
    }

    async fn put(&self, key: &OtpKey, code: &str, _ttl: Duration) -> Result<(), String> {
        if self.should_fail {
            return Err("store error".to_string());
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.codes
            .lock()
            .unwrap()
            .insert(key.as_str().to_string(), code.to_string());
        self.attempts.lock().unwrap().remove(key.as_str());
        Ok(())
    }

    async fn put_if_absent(
        &self,
        key: &OtpKey,
        code: &str,
        _ttl: Duration,
    ) -> Result<bool, String> {
        if self.should_fail {
            return Err("store error".to_string());
        }
        let mut codes = self.codes.lock().unwrap();
        if codes.contains_key(key.as_str()) {
            return Ok(false);
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        codes.insert(key.as_str().to_string(), code.to_string());
        self.attempts.lock().unwrap().remove(key.as_str());
        Ok(true)
    }

    async fn consume_if_matches(&self, key: &OtpKey, candidate: &str) -> Result<bool, String> {
        if self.should_fail {
            return Err("store error".to_string());
        }
        let mut codes = self.codes.lock().unwrap();
        match codes.get(key.as_str()) {
            Some(stored) if stored == candidate => {
                codes.remove(key.as_str());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, key: &OtpKey) -> Result<bool, String> {
        if self.should_fail {
            return Err("store error".to_string());
        }
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(self.codes.lock().unwrap().remove(key.as_str()).is_some())
    }

    async fn record_failed_attempt(&self, key: &OtpKey, _ttl: Duration) -> Result<i64, String> {
        if self.should_fail {
            return Err("store error".to_string());
        }
        let mut attempts = self.attempts.lock().unwrap();
        let count = attempts.entry(key.as_str().to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn failed_attempts(&self, key: &OtpKey) -> Result<i64, String> {
        if self.should_fail {
            return Err("store error".to_string());
        }
        Ok(self
            .attempts
            .lock()
            .unwrap()
            .get(key.as_str())
            .copied()
            .unwrap_or(0))
    }
}

// Mock sender for testing
pub struct MockOtpSender {
    channel: OtpChannel,
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub should_fail: bool,
}

impl MockOtpSender {
    pub fn new(channel: OtpChannel, should_fail: bool) -> Self {
        Self {
            channel,
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail,
        }
    }

    pub fn delivery_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_code_for(&self, destination: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(dest, _)| dest == destination)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl OtpSender for MockOtpSender {
    fn channel(&self) -> OtpChannel {
        self.channel
    }

    async fn send(&self, destination: &str, code: &str) -> Result<String, String> {
        if self.should_fail {
            return Err("sender error".to_string());
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), code.to_string()));
        Ok(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }
}
