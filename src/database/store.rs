use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Document collections known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Profiles,
    Posts,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Users, Collection::Profiles, Collection::Posts];

    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Profiles => "profiles",
            Collection::Posts => "posts",
        }
    }

    /// At most one document per owner (users own themselves, one profile per user)
    pub fn owner_is_unique(&self) -> bool {
        matches!(self, Collection::Users | Collection::Profiles)
    }
}

/// Errors from a DocumentStore
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upsert by owner requires a unique owner, {0} has none")]
    OwnerNotUnique(&'static str),

    #[error("Document is not a JSON object in {0}")]
    MalformedDocument(&'static str),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Document storage reachable by primary key and owner.
///
/// Every document is a JSON object. Writes replace the whole document except
/// `upsert_by_owner`, which merges top-level fields atomically.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<Value>, StoreError>;

    async fn find_one_by_owner(
        &self,
        collection: Collection,
        owner_id: Uuid,
    ) -> Result<Option<Value>, StoreError>;

    /// All documents in insertion order
    async fn find_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;

    /// Insert or replace the whole document
    async fn save(
        &self,
        collection: Collection,
        id: Uuid,
        owner_id: Uuid,
        doc: Value,
    ) -> Result<(), StoreError>;

    /// Create `on_insert` merged with `fields` when the owner has no document,
    /// otherwise merge-set `fields` into the existing one. Returns the stored result.
    async fn upsert_by_owner(
        &self,
        collection: Collection,
        owner_id: Uuid,
        insert_id: Uuid,
        on_insert: Value,
        fields: Map<String, Value>,
    ) -> Result<Value, StoreError>;

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<bool, StoreError>;

    async fn delete_by_owner(
        &self,
        collection: Collection,
        owner_id: Uuid,
    ) -> Result<u64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Top-level `$set`: each field replaces the target's value wholesale
pub fn merge_set(target: &mut Map<String, Value>, fields: &Map<String, Value>) {
    for (key, value) in fields {
        target.insert(key.clone(), value.clone());
    }
}

pub(crate) fn ensure_owner_unique(collection: Collection) -> Result<(), StoreError> {
    if collection.owner_is_unique() {
        Ok(())
    } else {
        Err(StoreError::OwnerNotUnique(collection.table_name()))
    }
}
