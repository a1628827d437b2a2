pub mod memory;
pub mod postgres;
pub mod repository;
pub mod store;

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;
pub use repository::{Document, Repository};
pub use store::{Collection, DocumentStore, StoreError};

/// Build the configured store, running migrations for Postgres
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let store = PgDocumentStore::connect(config).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}
