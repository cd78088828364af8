// region:    --- Imports
use crate::config::AppConfig;
use crate::dao::{MemoryStore, Store};
use crate::database::DatabaseManager;
use crate::notification::{self, Notifier};
use std::sync::Arc;
use tracing::{info, warn};

// endregion: --- Imports

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Connect to PostgreSQL when `DATABASE_URL` is set, otherwise fall back to memory
    pub async fn from_config(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                let db_manager = DatabaseManager::connect(url, config.db_max_connections).await?;
                db_manager.initialize_database().await?;
                info!("{:<12} --> using PostgreSQL store", "State");
                Arc::new(db_manager)
            }
            None => {
                warn!(
                    "{:<12} --> DATABASE_URL not set, data lives in memory only",
                    "State"
                );
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::new(store, notification::from_config(config.mailgun.clone())))
    }
}
