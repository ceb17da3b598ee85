use crate::config::{AppConfig, StoreBackend};
use crate::db;
use crate::students::{MemoryStudentStore, PgStudentStore, StudentStore};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Self::from_config(config).await
    }

    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store = match config.backend {
            StoreBackend::Postgres => {
                let cfg = config
                    .database
                    .as_ref()
                    .context("postgres backend needs database settings")?;
                let pool = db::connect(cfg).await?;
                db::migrate(&pool).await;
                Arc::new(PgStudentStore::new(pool)) as Arc<dyn StudentStore>
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory student store; data is lost on exit");
                Arc::new(MemoryStudentStore::default()) as Arc<dyn StudentStore>
            }
        };
        Ok(Self::from_parts(store, Arc::new(config)))
    }

    pub fn from_parts(store: Arc<dyn StudentStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// State over an empty in-memory store.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            backend: StoreBackend::Memory,
            database: None,
            host: "127.0.0.1".into(),
            port: 0,
        });
        Self::from_parts(Arc::new(MemoryStudentStore::default()), config)
    }
}
