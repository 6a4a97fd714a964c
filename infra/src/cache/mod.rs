//! Cache layer: Redis client and the OTP store implementations
//!
//! `RedisOtpStore` is the production store; `MemoryOtpStore` is the
//! single-process fallback used in development and tests.

pub mod memory_store;
pub mod redis_client;
pub mod redis_store;

pub use memory_store::MemoryOtpStore;
pub use redis_client::RedisClient;
pub use redis_store::RedisOtpStore;
