//! Mock sender for development and testing
//!
//! Logs deliveries instead of performing them, tracks what was "sent",
//! and can simulate failures. Usable for any channel, so a development
//! registry can cover EMAIL and SMS with two instances.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use otp_core::domain::request::OtpChannel;
use otp_core::services::otp::OtpSender;

use crate::senders::mask_destination;

/// Sender that records deliveries instead of performing them
#[derive(Clone)]
pub struct MockOtpSender {
    /// Channel this instance claims
    channel: OtpChannel,
    /// Number of deliveries performed
    delivery_count: Arc<AtomicU64>,
    /// Last code "delivered" per destination
    sent_codes: Arc<Mutex<HashMap<String, String>>>,
    /// Whether to fail every send (for testing)
    simulate_failure: bool,
    /// Whether to print deliveries to the console
    console_output: bool,
}

impl MockOtpSender {
    /// Create a mock sender for a channel
    pub fn new(channel: OtpChannel) -> Self {
        Self::with_options(channel, true, false)
    }

    /// Create a mock sender with configurable options
    pub fn with_options(channel: OtpChannel, console_output: bool, simulate_failure: bool) -> Self {
        Self {
            channel,
            delivery_count: Arc::new(AtomicU64::new(0)),
            sent_codes: Arc::new(Mutex::new(HashMap::new())),
            simulate_failure,
            console_output,
        }
    }

    /// Total number of deliveries performed
    pub fn delivery_count(&self) -> u64 {
        self.delivery_count.load(Ordering::SeqCst)
    }

    /// Last code delivered to a destination
    pub fn last_code(&self, destination: &str) -> Option<String> {
        self.sent_codes.lock().unwrap().get(destination).cloned()
    }

    /// Reset the delivery counter
    pub fn reset_counter(&self) {
        self.delivery_count.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl OtpSender for MockOtpSender {
    fn channel(&self) -> OtpChannel {
        self.channel
    }

    async fn send(&self, destination: &str, code: &str) -> Result<String, String> {
        if self.simulate_failure {
            warn!(
                channel = %self.channel,
                destination = %mask_destination(destination),
                "Mock sender simulating delivery failure"
            );
            return Err("Simulated delivery failure".to_string());
        }

        let message_id = format!("mock-{}", Uuid::new_v4());
        let count = self.delivery_count.fetch_add(1, Ordering::SeqCst) + 1;

        self.sent_codes
            .lock()
            .unwrap()
            .insert(destination.to_string(), code.to_string());

        if self.console_output {
            println!(
                "[mock {}] delivery #{} to {}: code {} (message id {})",
                self.channel, count, destination, code, message_id
            );
        }

        info!(
            channel = %self.channel,
            destination = %mask_destination(destination),
            message_id = %message_id,
            "OTP delivered (mock)"
        );

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_send_records_delivery() {
        let sender = MockOtpSender::with_options(OtpChannel::Sms, false, false);
        let message_id = sender.send("+15551234567", "123456").await.unwrap();

        assert!(message_id.starts_with("mock-"));
        assert_eq!(sender.delivery_count(), 1);
        assert_eq!(sender.last_code("+15551234567"), Some("123456".to_string()));
    }

    #[tokio::test]
    async fn test_mock_send_simulated_failure() {
        let sender = MockOtpSender::with_options(OtpChannel::Email, false, true);
        let result = sender.send("user@example.com", "123456").await;

        assert!(result.is_err());
        assert_eq!(sender.delivery_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_counter_reset() {
        let sender = MockOtpSender::with_options(OtpChannel::Sms, false, false);
        for _ in 0..3 {
            sender.send("+15551234567", "123456").await.unwrap();
        }
        assert_eq!(sender.delivery_count(), 3);

        sender.reset_counter();
        assert_eq!(sender.delivery_count(), 0);
    }
}
