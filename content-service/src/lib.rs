//! Content generator service: forwards free-form prompts to Gemini.

pub mod config;
pub mod handlers;
pub mod startup;
