use service_core::config::{self as core_config, get_env, get_env_parsed, require_env};
use service_core::error::AppError;
use service_core::providers::gemini::{GeminiConfig, GEMINI_API_BASE};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default lifetime of a cached skill tree, in seconds.
pub const DEFAULT_CACHE_TIMEOUT_SECONDS: u64 = 600;

/// Default cap on cached skill trees. Zero disables the cap.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 500;

#[derive(Debug, Clone)]
pub struct EduPlannerConfig {
    pub common: core_config::Config,
    pub gemini: GeminiConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub timeout_seconds: u64,
    pub max_entries: usize,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl EduPlannerConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load(DEFAULT_PORT)?;
        let is_prod = common.is_prod();

        Ok(EduPlannerConfig {
            gemini: GeminiConfig {
                api_key: require_env("GEMINI_API_KEY")?,
                model: get_env("GEMINI_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                base_url: get_env("GEMINI_BASE_URL", Some(GEMINI_API_BASE), is_prod)?,
            },
            cache: CacheConfig {
                timeout_seconds: get_env_parsed(
                    "CACHE_TIMEOUT_SECONDS",
                    DEFAULT_CACHE_TIMEOUT_SECONDS,
                    is_prod,
                )?,
                max_entries: get_env_parsed(
                    "CACHE_MAX_ENTRIES",
                    DEFAULT_CACHE_MAX_ENTRIES,
                    is_prod,
                )?,
            },
            common,
        })
    }
}
