use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::store::{ensure_owner_unique, Collection, DocumentStore, StoreError};
use crate::config::StorageConfig;

/// JSONB document store, one table per collection
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub async fn connect(config: &StorageConfig) -> Result<Self, StoreError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool ({} max connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Create collection tables and owner indexes if missing
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            for statement in Self::schema_statements(collection) {
                sqlx::query(&statement).execute(&self.pool).await?;
            }
            info!("Ensured table: {}", collection.table_name());
        }
        Ok(())
    }

    fn schema_statements(collection: Collection) -> Vec<String> {
        let table = collection.table_name();
        let unique = if collection.owner_is_unique() { "UNIQUE " } else { "" };
        vec![
            format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id UUID PRIMARY KEY,
                    owner_id UUID NOT NULL,
                    doc JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )"
            ),
            format!(
                "CREATE {unique}INDEX IF NOT EXISTS {table}_owner_id_idx ON {table} (owner_id)"
            ),
        ]
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn load_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<Value>, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", collection.table_name());
        let doc = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc.map(|Json(v)| v))
    }

    async fn find_one_by_owner(
        &self,
        collection: Collection,
        owner_id: Uuid,
    ) -> Result<Option<Value>, StoreError> {
        let sql = format!(
            "SELECT doc FROM {} WHERE owner_id = $1 ORDER BY created_at LIMIT 1",
            collection.table_name()
        );
        let doc = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc.map(|Json(v)| v))
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let sql = format!("SELECT doc FROM {} ORDER BY created_at", collection.table_name());
        let docs = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(docs.into_iter().map(|Json(v)| v).collect())
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

        let sql = format!(
            "INSERT INTO {table} (id, owner_id, doc) VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE
             SET owner_id = EXCLUDED.owner_id, doc = EXCLUDED.doc, updated_at = now()",
            table = collection.table_name()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(Json(doc))
            .execute(&self.pool)
            .await?;
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
        if !on_insert.is_object() {
            return Err(StoreError::MalformedDocument(collection.table_name()));
        }

        // jsonb || is a top-level merge, so this is a single atomic merge-set
        let sql = format!(
            "INSERT INTO {table} (id, owner_id, doc) VALUES ($1, $2, $3::jsonb || $4::jsonb)
             ON CONFLICT (owner_id) DO UPDATE
             SET doc = {table}.doc || $4::jsonb, updated_at = now()
             RETURNING doc",
            table = collection.table_name()
        );
        let Json(doc) = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(insert_id)
            .bind(owner_id)
            .bind(Json(on_insert))
            .bind(Json(Value::Object(fields)))
            .fetch_one(&self.pool)
            .await?;
        Ok(doc)
    }

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.table_name());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_owner(
        &self,
        collection: Collection,
        owner_id: Uuid,
    ) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {} WHERE owner_id = $1", collection.table_name());
        let result = sqlx::query(&sql).bind(owner_id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
