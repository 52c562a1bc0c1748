//! AI assistant service: a single `/chat` endpoint over an OpenRouter chat model.

pub mod config;
pub mod handlers;
pub mod startup;
