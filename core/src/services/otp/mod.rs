//! OTP service module
//!
//! This module provides the complete one-time passcode workflow:
//! - Code generation from the OS CSPRNG
//! - Single-active-code issuance with out-of-band delivery
//! - Single-use, expiry-aware validation
//! - Channel registry mapping delivery channels to senders
//! - Store and sender seams implemented by the infrastructure layer

mod config;
mod generator;
mod registry;
mod service;
mod store;

#[cfg(test)]
mod tests;

pub use config::{OtpServiceConfig, DEFAULT_CODE_LENGTH, DEFAULT_TTL_SECONDS};
pub use generator::generate_code;
pub use registry::{ChannelRegistry, OtpSender};
pub use service::{IssueOutcome, OtpService};
pub use store::{OtpKey, OtpStore};
