use crate::config::AppConfig;
use crate::events::ContentEvents;
use crate::seo::llm::{AnthropicClient, TextGenerator};
use crate::store::{ContentStore, InMemoryStore, PgContentStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub config: Arc<AppConfig>,
    pub events: ContentEvents,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.database_url {
            Some(url) => Arc::new(PgContentStore::connect(url).await?) as Arc<dyn ContentStore>,
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on exit");
                Arc::new(InMemoryStore::new()) as Arc<dyn ContentStore>
            }
        };

        if config.llm.api_key.is_none() {
            tracing::warn!("ANTHROPIC_API_KEY not set; SEO suggestions will be unavailable");
        }
        let generator = Arc::new(AnthropicClient::new(&config.llm)?) as Arc<dyn TextGenerator>;

        Ok(Self::from_parts(store, generator, config))
    }

    pub fn from_parts(
        store: Arc<dyn ContentStore>,
        generator: Arc<dyn TextGenerator>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            generator,
            config,
            events: ContentEvents::default(),
        }
    }

    /// In-memory store, no model access, default configuration.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::seo::llm::{fake::ScriptedGenerator, LlmError};

        Self::fake_with_generator(Arc::new(ScriptedGenerator::failing(LlmError::MissingApiKey)))
    }

    #[cfg(test)]
    pub fn fake_with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        let config = Arc::new(
            AppConfig::from_lookup(|_| None).expect("default config is valid"),
        );
        Self::from_parts(Arc::new(InMemoryStore::new()), generator, config)
    }
}
