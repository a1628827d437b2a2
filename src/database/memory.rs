use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{ensure_owner_unique, merge_set, Collection, DocumentStore, StoreError};

#[derive(Debug, Clone)]
struct Row {
    id: Uuid,
    owner_id: Uuid,
    doc: Value,
}

/// Process-local store used for development and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|rows| rows.iter().find(|r| r.id == id))
            .map(|r| r.doc.clone()))
    }

    async fn find_one_by_owner(
        &self,
        collection: Collection,
        owner_id: Uuid,
    ) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|rows| rows.iter().find(|r| r.owner_id == owner_id))
            .map(|r| r.doc.clone()))
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|rows| rows.iter().map(|r| r.doc.clone()).collect())
            .unwrap_or_default())
    }

    async fn save(
        &self,
        collection: Collection,
        id: Uuid,
        owner_id: Uuid,
        doc: Value,
    ) -> Result<(), StoreError> {
        if !doc.is_object() {
            return Err(StoreError::MalformedDocument(collection.table_name()));
        }

        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection).or_default();
        match rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.owner_id = owner_id;
                row.doc = doc;
            }
            None => rows.push(Row { id, owner_id, doc }),
        }
        Ok(())
    }

    async fn upsert_by_owner(
        &self,
        collection: Collection,
        owner_id: Uuid,
        insert_id: Uuid,
        on_insert: Value,
        fields: Map<String, Value>,
    ) -> Result<Value, StoreError> {
        ensure_owner_unique(collection)?;

        // Write lock held for the whole read-merge-write
        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection).or_default();

        if let Some(row) = rows.iter_mut().find(|r| r.owner_id == owner_id) {
            let doc = row
                .doc
                .as_object_mut()
                .ok_or(StoreError::MalformedDocument(collection.table_name()))?;
            merge_set(doc, &fields);
            return Ok(row.doc.clone());
        }

        let Value::Object(mut doc) = on_insert else {
            return Err(StoreError::MalformedDocument(collection.table_name()));
        };
        merge_set(&mut doc, &fields);
        let doc = Value::Object(doc);
        rows.push(Row {
            id: insert_id,
            owner_id,
            doc: doc.clone(),
        });
        Ok(doc)
    }

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(rows) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() != before)
    }

    async fn delete_by_owner(
        &self,
        collection: Collection,
        owner_id: Uuid,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(rows) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| r.owner_id != owner_id);
        Ok((before - rows.len()) as u64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
