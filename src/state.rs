use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{MemoryStore, PgStore, ThoughtStore, UserStore};

/// Process-wide context, built once at startup and passed explicitly into
/// every handler. No hidden singletons.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub thoughts: Arc<dyn ThoughtStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        match &config.database_url {
            Some(url) => {
                let store = PgStore::connect(url).await?;
                store.migrate().await;
                Ok(Self {
                    users: Arc::new(store.clone()),
                    thoughts: Arc::new(store),
                    config,
                })
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using the in-memory store");
                Ok(Self::in_memory_with_config(config))
            }
        }
    }

    /// State over a fresh in-memory backend. Used by the test suites.
    pub fn in_memory() -> Self {
        Self::in_memory_with_config(Arc::new(AppConfig::default()))
    }

    fn in_memory_with_config(config: Arc<AppConfig>) -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            thoughts: Arc::new(store),
            config,
        }
    }
}
