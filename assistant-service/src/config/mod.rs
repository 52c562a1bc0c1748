use service_core::config::{self as core_config, get_env, get_env_parsed, require_env};
use service_core::error::AppError;
use service_core::providers::openrouter::{OpenRouterConfig, OPENROUTER_API_BASE};

/// Port the assistant listens on when neither `PORT` nor `APP__PORT` is set.
pub const DEFAULT_PORT: u16 = 7000;

/// Default OpenRouter model.
pub const DEFAULT_MODEL: &str = "qwen/qwen3-235b-a22b:free";

/// Longest accepted chat message, in characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 8000;

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub common: core_config::Config,
    pub openrouter: OpenRouterConfig,
    pub max_message_length: usize,
}

impl AssistantConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load(DEFAULT_PORT)?;
        let is_prod = common.is_prod();

        Ok(AssistantConfig {
            openrouter: OpenRouterConfig {
                api_key: require_env("OPENROUTER_API_KEY")?,
                model: get_env("OPENROUTER_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                base_url: get_env("OPENROUTER_BASE_URL", Some(OPENROUTER_API_BASE), is_prod)?,
            },
            max_message_length: get_env_parsed(
                "ASSISTANT_MAX_MESSAGE_LENGTH",
                DEFAULT_MAX_MESSAGE_LENGTH,
                is_prod,
            )?,
            common,
        })
    }
}
