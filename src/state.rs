use crate::config::{AppConfig, StorageConfig};
use crate::estimation::Estimator;
use crate::ledger::Ledger;
use crate::storage::{MemoryStorage, Storage, StorageClient};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Appends take the write lock; every read shares the read lock.
    pub ledger: Arc<RwLock<Ledger>>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let storage = match &config.storage {
            StorageConfig::S3(s3) => {
                tracing::info!(
                    endpoint = %s3.endpoint,
                    bucket = %s3.bucket,
                    "using s3 photo storage"
                );
                Arc::new(Storage::new(s3).await?) as Arc<dyn StorageClient>
            }
            StorageConfig::Memory => {
                tracing::info!("using in-memory photo storage");
                Arc::new(MemoryStorage::new()) as Arc<dyn StorageClient>
            }
        };

        Ok(Self::from_parts(Arc::new(config), storage))
    }

    /// Fresh, empty ledger built from the config's calorie table.
    pub fn from_parts(config: Arc<AppConfig>, storage: Arc<dyn StorageClient>) -> Self {
        let ledger = Ledger::new(Estimator::new(config.calorie_table.clone()));
        Self {
            config,
            ledger: Arc::new(RwLock::new(ledger)),
            storage,
        }
    }

    /// Default config with in-memory storage.
    pub fn fake() -> Self {
        Self::from_parts(
            Arc::new(AppConfig::default()),
            Arc::new(MemoryStorage::new()),
        )
    }
}
