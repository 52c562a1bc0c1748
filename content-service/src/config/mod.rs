use service_core::config::{self as core_config, get_env, require_env};
use service_core::error::AppError;
use service_core::providers::gemini::{GeminiConfig, GEMINI_API_BASE};

pub const DEFAULT_PORT: u16 = 5000;

/// Default Gemini model for content generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub common: core_config::Config,
    pub gemini: GeminiConfig,
}

impl ContentConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load(DEFAULT_PORT)?;
        let is_prod = common.is_prod();

        Ok(ContentConfig {
            gemini: GeminiConfig {
                api_key: require_env("GOOGLE_API_KEY")?,
                model: get_env("GEMINI_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                base_url: get_env("GEMINI_BASE_URL", Some(GEMINI_API_BASE), is_prod)?,
            },
            common,
        })
    }
}
