//! Sender capability and the channel registry

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::request::OtpChannel;
use crate::errors::{OtpError, OtpResult};

/// Capability for delivering a code out-of-band through one channel
///
/// Implementations are stateless or hold only their own delivery
/// transport. Success yields a provider message identifier; failures are
/// opaque `String` payloads wrapped into `OtpError::DeliveryFailed` by
/// the coordinator.
#[async_trait]
pub trait OtpSender: Send + Sync {
    /// The delivery channel this sender handles
    fn channel(&self) -> OtpChannel;

    /// Deliver `code` to `destination`, returning a provider message id
    async fn send(&self, destination: &str, code: &str) -> Result<String, String>;
}

/// Map from delivery channel to its sender, built once at startup
///
/// An explicit, constructor-built map: there is no ambient registration
/// mechanism, and two senders claiming the same channel fail the build
/// rather than silently shadowing each other at request time.
pub struct ChannelRegistry {
    senders: HashMap<OtpChannel, Arc<dyn OtpSender>>,
}

impl ChannelRegistry {
    /// Build the registry from the full set of available senders
    pub fn new(senders: Vec<Arc<dyn OtpSender>>) -> OtpResult<Self> {
        let mut map: HashMap<OtpChannel, Arc<dyn OtpSender>> =
            HashMap::with_capacity(senders.len());
        for sender in senders {
            let channel = sender.channel();
            if map.insert(channel, sender).is_some() {
                return Err(OtpError::DuplicateSender { channel });
            }
        }
        Ok(Self { senders: map })
    }

    /// Look up the sender for a channel
    pub fn resolve(&self, channel: OtpChannel) -> OtpResult<&Arc<dyn OtpSender>> {
        self.senders
            .get(&channel)
            .ok_or(OtpError::UnsupportedChannel { channel })
    }

    /// Channels with a registered sender, for startup self-checks
    pub fn channels(&self) -> Vec<OtpChannel> {
        let mut channels: Vec<OtpChannel> = self.senders.keys().copied().collect();
        channels.sort_by_key(|c| c.as_str());
        channels
    }
}
