//! Skill-tree generation: prompt templating, model call and JSON recovery.

use super::cache::TtlCache;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use service_core::error::AppError;
use service_core::providers::{GenerationParams, ProviderError, TextProvider};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Instructions sent ahead of every domain.
pub const BASE_PROMPT: &str = r#"
You are an expert curriculum designer.

Create a JSON object describing a learning skill tree for the given domain.

Follow this structure exactly:

{
  "domain": "<domain name>",
  "primary_skills": [
    {
      "name": "<skill name>",
      "description": "<brief description>",
      "estimated_hours": <number>,
      "milestones": [
        {
          "name": "<milestone>",
          "target": "<goal>",
          "estimated_hours": <number>,
          "resources": [
            { "title": "<resource title>", "url": "<link>" }
          ]
        }
      ]
    }
  ]
}

Generate 5–8 primary skills, each with 3–6 milestones.
Respond ONLY with JSON. Do not include ```json fences.
"#;

/// Output budget large enough for a full tree; smaller limits truncate mid-JSON.
pub const MAX_OUTPUT_TOKENS: i32 = 6000;

pub const TEMPERATURE: f32 = 0.3;

/// Greedy span from the first `{` to the last `}`, across lines.
static JSON_OBJECT_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"));

#[derive(Debug, Error)]
pub enum SkillTreeError {
    #[error("Gemini returned no text output (likely max tokens issue).")]
    EmptyOutput,

    #[error("Failed to extract valid JSON")]
    NoJson,

    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl From<SkillTreeError> for AppError {
    fn from(err: SkillTreeError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

/// Full prompt for `domain`.
pub fn build_prompt(domain: &str) -> String {
    format!("{}\nDomain: {}\n", BASE_PROMPT, domain)
}

/// Recover the skill-tree document from raw model output.
///
/// Code fences (with an optional `json` tag) are stripped first. If the
/// remainder is not valid JSON, the outermost `{...}` span is tried instead.
pub fn parse_skill_tree(raw: &str) -> Result<Value, SkillTreeError> {
    let mut text = raw.trim();

    if text.starts_with("```") {
        text = text.trim_matches('`');
        if text
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
        {
            text = text[4..].trim();
        }
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(direct_err) => {
            tracing::debug!(error = %direct_err, "Direct parse failed, searching for JSON object span");
            let span = JSON_OBJECT_SPAN
                .find(text)
                .ok_or(SkillTreeError::NoJson)?;
            Ok(serde_json::from_str(span.as_str())?)
        }
    }
}

/// Whether a tree came from the cache or a fresh model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// Read-through generator: serves cached trees per domain and asks the model
/// on a miss.
pub struct SkillTreeGenerator {
    provider: Arc<dyn TextProvider>,
    cache: TtlCache<String, Value>,
}

impl SkillTreeGenerator {
    pub fn new(provider: Arc<dyn TextProvider>, cache_ttl: Duration, max_cached: usize) -> Self {
        Self {
            provider,
            cache: TtlCache::new(cache_ttl).with_max_entries(max_cached),
        }
    }

    pub fn cache(&self) -> &TtlCache<String, Value> {
        &self.cache
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Skill tree for an already-trimmed, non-empty `domain`.
    pub async fn generate(&self, domain: &str) -> Result<(Value, CacheStatus), SkillTreeError> {
        if let Some(tree) = self.cache.get(&domain.to_string()) {
            tracing::debug!(domain, "Skill tree served from cache");
            return Ok((tree, CacheStatus::Hit));
        }

        let params = GenerationParams {
            temperature: Some(TEMPERATURE),
            max_tokens: Some(MAX_OUTPUT_TOKENS),
            ..Default::default()
        };

        let response = self
            .provider
            .generate(&build_prompt(domain), &params)
            .await?;

        let text = response.text.as_deref().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            tracing::warn!(
                domain,
                finish_reason = ?response.finish_reason,
                output_tokens = response.output_tokens,
                "Gemini returned no text"
            );
            return Err(SkillTreeError::EmptyOutput);
        }

        tracing::debug!(domain, raw = %text, "Raw Gemini response");

        let tree = parse_skill_tree(text)?;
        self.cache.insert(domain.to_string(), tree.clone());

        tracing::info!(
            domain,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Skill tree generated"
        );

        Ok((tree, CacheStatus::Miss))
    }
}
