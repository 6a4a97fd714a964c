//! HTTP SMS-gateway sender for the SMS channel

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use otp_core::domain::request::OtpChannel;
use otp_core::services::otp::OtpSender;
use otp_shared::config::SmsGatewayConfig;

use crate::senders::mask_destination;
use crate::InfrastructureError;

/// Upper bound accepted by common gateways for a single message
const MAX_MESSAGE_LENGTH: usize = 1600;

/// Response shape returned by the gateway on success
#[derive(Debug, Deserialize)]
struct GatewayResponse {
    message_id: Option<String>,
}

/// Delivers OTP codes through an authenticated HTTP SMS gateway
pub struct GatewaySmsSender {
    http: reqwest::Client,
    config: SmsGatewayConfig,
}

impl GatewaySmsSender {
    /// Create a new gateway sender
    pub fn new(config: SmsGatewayConfig) -> Result<Self, InfrastructureError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(InfrastructureError::Http)?;

        info!(
            from = %mask_destination(&config.from_number),
            endpoint = %config.endpoint,
            "SMS gateway sender initialized"
        );

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(SmsGatewayConfig::from_env())
    }

    /// Basic-auth header value for the gateway credentials
    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.config.api_key, self.config.api_secret);
        format!("Basic {}", BASE64.encode(credentials))
    }

    /// Lightweight E.164 shape check
    fn is_valid_phone_number(phone: &str) -> bool {
        if !phone.starts_with('+') {
            return false;
        }
        let digits = &phone[1..];
        (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
    }

    /// POST the message once, returning the gateway message id
    async fn post_message(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .header("Authorization", self.auth_header())
            .json(&json!({
                "from": self.config.from_number,
                "to": to,
                "body": body,
            }))
            .send()
            .await
            .map_err(InfrastructureError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(InfrastructureError::Sms(format!(
                "Gateway returned status {}",
                status
            )));
        }

        let parsed: GatewayResponse = response
            .json()
            .await
            .unwrap_or(GatewayResponse { message_id: None });

        Ok(parsed
            .message_id
            .unwrap_or_else(|| format!("sms-{}", Uuid::new_v4())))
    }

    /// Send with bounded exponential-backoff retry
    ///
    /// Retries on transport errors and 429/5xx statuses; client errors
    /// fail immediately.
    async fn send_with_retry(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;
            debug!(
                to = %mask_destination(to),
                attempt = attempts,
                max_attempts = self.config.max_retries,
                "Sending SMS through gateway"
            );

            match self.post_message(to, body).await {
                Ok(message_id) => {
                    info!(
                        to = %mask_destination(to),
                        message_id = %message_id,
                        "SMS sent through gateway"
                    );
                    return Ok(message_id);
                }
                Err(e) => {
                    let retriable = match &e {
                        InfrastructureError::Http(err) => {
                            err.is_timeout() || err.is_connect() || err.is_request()
                        }
                        InfrastructureError::Sms(msg) => {
                            msg.contains("429")
                                || msg.contains("500")
                                || msg.contains("502")
                                || msg.contains("503")
                                || msg.contains("504")
                        }
                        _ => false,
                    };

                    if !retriable || attempts >= self.config.max_retries {
                        error!(
                            to = %mask_destination(to),
                            attempts,
                            error = %e,
                            "Failed to send SMS through gateway"
                        );
                        return Err(e);
                    }

                    warn!(
                        to = %mask_destination(to),
                        attempt = attempts,
                        error = %e,
                        "Gateway send failed, retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl OtpSender for GatewaySmsSender {
    fn channel(&self) -> OtpChannel {
        OtpChannel::Sms
    }

    async fn send(&self, destination: &str, code: &str) -> Result<String, String> {
        if !Self::is_valid_phone_number(destination) {
            return Err(format!(
                "Invalid phone number format: {}",
                mask_destination(destination)
            ));
        }

        let body = format!("Your verification code is {code}. It can be used once.");
        if body.len() > MAX_MESSAGE_LENGTH {
            return Err("Message exceeds maximum gateway length".to_string());
        }

        self.send_with_retry(destination, &body)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_number_validation() {
        assert!(GatewaySmsSender::is_valid_phone_number("+905551112233"));
        assert!(GatewaySmsSender::is_valid_phone_number("+14155552671"));

        assert!(!GatewaySmsSender::is_valid_phone_number("905551112233")); // no plus
        assert!(!GatewaySmsSender::is_valid_phone_number("+123")); // too short
        assert!(!GatewaySmsSender::is_valid_phone_number("+1234567890123456")); // too long
        assert!(!GatewaySmsSender::is_valid_phone_number("+123abc4567890")); // letters
    }

    #[test]
    fn test_auth_header_is_basic() {
        let config = SmsGatewayConfig {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            ..Default::default()
        };
        let sender = GatewaySmsSender::new(config).unwrap();
        assert_eq!(
            sender.auth_header(),
            format!("Basic {}", BASE64.encode("key:secret"))
        );
    }

    #[test]
    fn test_sender_claims_sms_channel() {
        let sender = GatewaySmsSender::new(SmsGatewayConfig::default()).unwrap();
        assert_eq!(sender.channel(), OtpChannel::Sms);
    }
}
