use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use super::store::{Collection, DocumentStore, StoreError};

/// A typed document persisted as a whole
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
    /// Used in not-found messages, e.g. "Post not found"
    const NAME: &'static str;

    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;
}

pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _phantom: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    fn decode(doc: Value) -> Result<T, StoreError> {
        Ok(serde_json::from_value(doc)?)
    }

    fn not_found() -> StoreError {
        StoreError::NotFound(format!("{} not found", T::NAME))
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        self.store
            .load_by_id(T::COLLECTION, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub async fn find_404(&self, id: Uuid) -> Result<T, StoreError> {
        self.find(id).await?.ok_or_else(Self::not_found)
    }

    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<T>, StoreError> {
        self.store
            .find_one_by_owner(T::COLLECTION, owner_id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        self.store
            .find_all(T::COLLECTION)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Write back the whole document
    pub async fn save(&self, doc: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(doc)?;
        self.store
            .save(T::COLLECTION, doc.id(), doc.owner_id(), value)
            .await
    }

    /// Merge-set `fields` into the owner's document, creating it from `on_insert` if absent
    pub async fn upsert_by_owner(
        &self,
        owner_id: Uuid,
        on_insert: &T,
        fields: Map<String, Value>,
    ) -> Result<T, StoreError> {
        let insert = serde_json::to_value(on_insert)?;
        let doc = self
            .store
            .upsert_by_owner(T::COLLECTION, owner_id, on_insert.id(), insert, fields)
            .await?;
        Self::decode(doc)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.store.delete_by_id(T::COLLECTION, id).await
    }

    pub async fn delete_by_owner(&self, owner_id: Uuid) -> Result<u64, StoreError> {
        self.store.delete_by_owner(T::COLLECTION, owner_id).await
    }
}
