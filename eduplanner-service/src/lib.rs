//! EduPlanner service: generates learning skill trees for a domain with Gemini.

pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;
