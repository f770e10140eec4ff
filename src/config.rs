use anyhow::Context;
use serde::Deserialize;
use uuid::Uuid;

use crate::seed::PLACEHOLDER_AUTHOR_ID;

const DEFAULT_LLM_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_LLM_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `None` runs against the in-memory store.
    pub database_url: Option<String>,
    /// Author attached to every saved post until sessions exist.
    pub default_author_id: Uuid,
    pub seed_demo_data: bool,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = get("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let default_author_id = match get("DEFAULT_AUTHOR_ID") {
            Some(v) => v
                .parse::<Uuid>()
                .with_context(|| format!("DEFAULT_AUTHOR_ID is not a UUID: {v}"))?,
            None => PLACEHOLDER_AUTHOR_ID,
        };
        let seed_demo_data = get("SEED_DEMO_DATA")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(true);

        let llm = LlmConfig {
            api_key: get("ANTHROPIC_API_KEY").filter(|v| !v.trim().is_empty()),
            api_url: get("LLM_API_URL").unwrap_or_else(|| DEFAULT_LLM_API_URL.into()),
            model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.into()),
            timeout_secs: get("LLM_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60),
            max_tokens: get("LLM_MAX_TOKENS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(1024),
        };

        Ok(Self {
            database_url,
            default_author_id,
            seed_demo_data,
            llm,
        })
    }
}
