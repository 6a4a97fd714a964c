//! # Otpkit Core
//!
//! Core domain layer for the one-time passcode subsystem. This crate
//! contains the request/enum types, the error taxonomy, the OTP
//! coordinator, the code generator, the channel registry, and the seam
//! traits implemented by the infrastructure layer.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
