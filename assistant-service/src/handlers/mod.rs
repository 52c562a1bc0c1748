//! HTTP handlers for the assistant service.

pub mod chat;
pub mod health;

pub use chat::chat;
pub use health::{health_check, readiness_check};
