//! SMTP sender for the EMAIL channel

use async_trait::async_trait;
use lettre::message::{header, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use otp_core::domain::request::OtpChannel;
use otp_core::services::otp::OtpSender;
use otp_shared::config::SmtpConfig;

use crate::senders::mask_destination;
use crate::InfrastructureError;

/// Delivers OTP codes as HTML-with-plaintext-fallback email
pub struct SmtpOtpSender {
    config: SmtpConfig,
}

impl SmtpOtpSender {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::new(SmtpConfig::from_env())
    }

    fn build_transport(&self) -> Result<SmtpTransport, InfrastructureError> {
        let credentials = Credentials::new(
            self.config.username.clone(),
            self.config.password.clone(),
        );

        let transport = if self.config.use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
        } else {
            SmtpTransport::relay(&self.config.smtp_host)
        }
        .map_err(InfrastructureError::Smtp)?
        .port(self.config.smtp_port)
        .credentials(credentials)
        .timeout(Some(Duration::from_secs(self.config.timeout_secs)))
        .build();

        Ok(transport)
    }

    fn build_message(&self, to: &str, code: &str) -> Result<Message, InfrastructureError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| InfrastructureError::Email(format!("Invalid from address: {}", e)))?;

        let to = to
            .parse()
            .map_err(|e| InfrastructureError::Email(format!("Invalid to address: {}", e)))?;

        let text_body = format!(
            "Your verification code is {code}. It is valid for a few minutes and can be used once."
        );
        let html_body = format!(
            "<p>Your verification code is</p>\
             <p style=\"font-size:24px;letter-spacing:4px\"><strong>{code}</strong></p>\
             <p>It is valid for a few minutes and can be used once. \
             If you did not request this code, you can ignore this message.</p>"
        );

        let body = MultiPart::alternative()
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_PLAIN)
                    .body(text_body),
            )
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_HTML)
                    .body(html_body),
            );

        Message::builder()
            .from(from)
            .to(to)
            .subject("Your verification code")
            .multipart(body)
            .map_err(|e| InfrastructureError::Email(format!("Failed to build message: {}", e)))
    }
}

#[async_trait]
impl OtpSender for SmtpOtpSender {
    fn channel(&self) -> OtpChannel {
        OtpChannel::Email
    }

    async fn send(&self, destination: &str, code: &str) -> Result<String, String> {
        debug!(
            to = %mask_destination(destination),
            "Sending OTP email"
        );

        let message = self.build_message(destination, code).map_err(|e| e.to_string())?;
        let transport = self.build_transport().map_err(|e| e.to_string())?;

        // The SMTP transport is blocking; run it off the async workers
        tokio::task::spawn_blocking(move || {
            transport
                .send(&message)
                .map_err(InfrastructureError::Smtp)
        })
        .await
        .map_err(|e| format!("SMTP task join error: {}", e))?
        .map_err(|e| e.to_string())?;

        let message_id = format!("smtp-{}", Uuid::new_v4());
        info!(
            to = %mask_destination(destination),
            message_id = %message_id,
            "OTP email sent"
        );
        Ok(message_id)
    }
}
