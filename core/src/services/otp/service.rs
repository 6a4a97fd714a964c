//! OTP coordinator implementation

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing;

use crate::domain::request::{IssueRequest, ValidateRequest};
use crate::errors::{OtpError, OtpResult};

use super::config::OtpServiceConfig;
use super::generator::generate_code;
use super::registry::ChannelRegistry;
use super::store::{OtpKey, OtpStore};

/// Result of an issuance call
#[derive(Debug, Clone)]
pub struct IssueOutcome {
    /// Whether a new code was generated and handed to a sender.
    /// `false` means an earlier unexpired code is still live and the
    /// call was an idempotent no-op: nothing was regenerated or resent.
    pub delivered: bool,
    /// Provider message id, when a delivery happened
    pub message_id: Option<String>,
    /// When the newly stored code expires; `None` on the no-op path
    /// (the earlier code keeps its original expiry)
    pub expires_at: Option<DateTime<Utc>>,
}

/// Coordinator for OTP issuance and validation
///
/// Stateless apart from its collaborators: all per-key state lives in
/// the store, so any number of service instances can run concurrently
/// against a shared store. The registry is an explicit map owned by the
/// service; there is no ambient sender lookup.
pub struct OtpService<S: OtpStore> {
    /// Expiring store holding live codes
    store: Arc<S>,
    /// Channel-to-sender map built at startup
    registry: ChannelRegistry,
    /// Service configuration
    config: OtpServiceConfig,
}

impl<S: OtpStore> OtpService<S> {
    /// Create a new OTP service
    pub fn new(store: Arc<S>, registry: ChannelRegistry, config: OtpServiceConfig) -> Self {
        tracing::info!(
            channels = ?registry.channels(),
            code_length = config.code_length,
            ttl_secs = config.ttl.as_secs(),
            "OTP service initialized"
        );
        Self {
            store,
            registry,
            config,
        }
    }

    /// Issue a new OTP for a (destination, purpose, channel) triple and
    /// deliver it through the channel's sender
    ///
    /// At most one live code exists per triple: when an unexpired code
    /// is already stored, the call returns `delivered: false` without
    /// generating or resending anything, and the existing code stays
    /// valid until consumed or expired.
    ///
    /// On delivery failure the freshly stored code is deleted again so
    /// the caller can retry issuance immediately.
    ///
    /// A caller that abandons the call between the store write and the
    /// send can strand a stored-but-undelivered code; the next `issue`
    /// for the triple will see it as live and not resend. The code then
    /// simply ages out. Accepted limitation.
    pub async fn issue(&self, request: &IssueRequest) -> OtpResult<IssueOutcome> {
        let destination = request.destination.trim();
        if destination.is_empty() {
            return Err(OtpError::InvalidRequest {
                message: "destination must not be empty".to_string(),
            });
        }

        // Resolve before touching the store: an unregistered channel
        // must not leave a stored code behind.
        let sender = self.registry.resolve(request.channel)?;

        let key = OtpKey::new(destination, request.purpose, request.channel);
        let code = generate_code(self.config.code_length);

        let stored = self
            .store
            .put_if_absent(&key, &code, self.config.ttl)
            .await
            .map_err(|e| {
                tracing::error!(
                    destination = %mask_destination(destination),
                    channel = %request.channel,
                    error = %e,
                    event = "otp_store_failed",
                    "Failed to store OTP"
                );
                OtpError::Store { message: e }
            })?;

        if !stored {
            tracing::info!(
                destination = %mask_destination(destination),
                purpose = %request.purpose,
                channel = %request.channel,
                event = "otp_already_live",
                "Unexpired code already present, issuance is a no-op"
            );
            return Ok(IssueOutcome {
                delivered: false,
                message_id: None,
                expires_at: None,
            });
        }

        let expires_at = Utc::now() + chrono::Duration::seconds(self.config.ttl.as_secs() as i64);

        match sender.send(destination, &code).await {
            Ok(message_id) => {
                tracing::info!(
                    destination = %mask_destination(destination),
                    purpose = %request.purpose,
                    channel = %request.channel,
                    message_id = %message_id,
                    ttl_secs = self.config.ttl.as_secs(),
                    event = "otp_issued",
                    "OTP stored and delivered"
                );
                Ok(IssueOutcome {
                    delivered: true,
                    message_id: Some(message_id),
                    expires_at: Some(expires_at),
                })
            }
            Err(e) => {
                // Roll back the stored code so a retry is not blocked
                // behind a code the user never received.
                if let Err(del_err) = self.store.delete(&key).await {
                    tracing::error!(
                        destination = %mask_destination(destination),
                        error = %del_err,
                        event = "otp_rollback_failed",
                        "Failed to roll back stored OTP after delivery failure"
                    );
                }
                tracing::error!(
                    destination = %mask_destination(destination),
                    purpose = %request.purpose,
                    channel = %request.channel,
                    error = %e,
                    event = "otp_delivery_failed",
                    "Sender failed to deliver OTP"
                );
                Err(OtpError::DeliveryFailed { message: e })
            }
        }
    }

    /// Validate a caller-supplied code against the live code for the
    /// triple, consuming it on match
    ///
    /// Returns a bare boolean: absent, expired, and mismatched codes are
    /// indistinguishable to the caller. A wrong guess never removes or
    /// expires the live code (unless the optional failed-attempt cap is
    /// configured and exhausted).
    pub async fn validate(&self, request: &ValidateRequest) -> OtpResult<bool> {
        let destination = request.destination.trim();
        let candidate = request.candidate_code.as_str();

        // A candidate of the wrong shape can never match; skip the store.
        if candidate.len() != self.config.code_length
            || !candidate.chars().all(|c| c.is_ascii_digit())
        {
            tracing::warn!(
                destination = %mask_destination(destination),
                candidate_length = candidate.len(),
                event = "otp_candidate_malformed",
                "Candidate code has the wrong shape"
            );
            return Ok(false);
        }

        let key = OtpKey::new(destination, request.purpose, request.channel);

        if let Some(limit) = self.config.failed_attempt_limit {
            let attempts = self
                .store
                .failed_attempts(&key)
                .await
                .map_err(|e| OtpError::Store { message: e })?;
            if attempts >= i64::from(limit) {
                tracing::warn!(
                    destination = %mask_destination(destination),
                    attempts,
                    event = "otp_attempts_exhausted",
                    "Failed-attempt cap reached, rejecting without compare"
                );
                return Ok(false);
            }
        }

        let matched = self
            .store
            .consume_if_matches(&key, candidate)
            .await
            .map_err(|e| {
                tracing::error!(
                    destination = %mask_destination(destination),
                    error = %e,
                    event = "otp_store_failed",
                    "Store failure during validation"
                );
                OtpError::Store { message: e }
            })?;

        if matched {
            tracing::info!(
                destination = %mask_destination(destination),
                purpose = %request.purpose,
                channel = %request.channel,
                event = "otp_consumed",
                "OTP validated and consumed"
            );
        } else {
            if self.config.failed_attempt_limit.is_some() {
                if let Err(e) = self
                    .store
                    .record_failed_attempt(&key, self.config.attempt_window)
                    .await
                {
                    tracing::warn!(
                        destination = %mask_destination(destination),
                        error = %e,
                        "Failed to record failed attempt"
                    );
                }
            }
            tracing::warn!(
                destination = %mask_destination(destination),
                purpose = %request.purpose,
                channel = %request.channel,
                event = "otp_validation_failed",
                "OTP validation failed"
            );
        }

        Ok(matched)
    }
}

/// Mask a destination for logging, keeping only the last four characters
fn mask_destination(destination: &str) -> String {
    if destination.chars().count() <= 4 {
        "****".to_string()
    } else {
        let tail: String = destination
            .chars()
            .skip(destination.chars().count() - 4)
            .collect();
        format!("***{tail}")
    }
}
