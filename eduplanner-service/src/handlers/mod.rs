//! HTTP handlers for the EduPlanner service.

pub mod health;
pub mod skill_tree;

pub use health::{health_check, readiness_check};
pub use skill_tree::generate_skill_tree;
