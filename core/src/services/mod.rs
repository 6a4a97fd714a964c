//! Business services containing domain logic.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    ChannelRegistry, IssueOutcome, OtpKey, OtpSender, OtpService, OtpServiceConfig, OtpStore,
};
