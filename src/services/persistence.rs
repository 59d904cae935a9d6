// src/services/persistence.rs

//! Local key-value cache of whole-store blobs, keyed by store name and
//! stamped with a version. A blob whose version does not match the
//! reader's is dropped; there are no migrations between versions.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::RwLock;

pub const TESTS_STORE: &str = "learnsmart-tests";
pub const PROGRESS_STORE: &str = "learnsmart-progress";
pub const ACHIEVEMENTS_STORE: &str = "learnsmart-achievements";
pub const ANALYTICS_STORE: &str = "learnsmart-analytics";
pub const PRACTICE_STORE: &str = "learnsmart-practice-tests";
pub const LEADERBOARD_STORE: &str = "learnsmart-leaderboard";

/// Bump when a store's serialized shape changes.
pub const STORE_VERSION: i64 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Failed to (de)serialize state: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub version: i64,
    pub data: Value,
}

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<StoredBlob>, StoreError>;
    async fn set(&self, name: &str, version: i64, data: Value) -> Result<(), StoreError>;
    async fn remove(&self, name: &str) -> Result<(), StoreError>;
    /// Writes every blob or none of them.
    async fn set_many(&self, blobs: Vec<NamedBlob>) -> Result<(), StoreError>;
}

/// One entry of an atomic multi-store write.
#[derive(Debug, Clone)]
pub struct NamedBlob {
    pub name: &'static str,
    pub version: i64,
    pub data: Value,
}

impl NamedBlob {
    pub fn encode<T: Serialize>(name: &'static str, version: i64, value: &T) -> Result<Self, StoreError> {
        Ok(Self {
            name,
            version,
            data: serde_json::to_value(value)?,
        })
    }
}

/// Reads `name` and decodes it, or `None` if absent or of another version.
pub async fn load_versioned<T: DeserializeOwned>(
    store: &dyn StateStore,
    name: &str,
    version: i64,
) -> Result<Option<T>, StoreError> {
    let Some(blob) = store.get(name).await? else {
        return Ok(None);
    };
    if blob.version != version {
        tracing::warn!(
            store = name,
            stored = blob.version,
            expected = version,
            "discarding state with mismatched version"
        );
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(blob.data)?))
}

/// Helper struct for reading blobs back.
#[derive(sqlx::FromRow)]
struct BlobRow {
    version: i64,
    data: String,
}

async fn upsert_blob<'e, E>(
    executor: E,
    name: &str,
    version: i64,
    data: &Value,
    updated_at: DateTime<Utc>,
) -> Result<(), StoreError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO state_blobs (name, version, data, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(name) DO UPDATE SET
            version = excluded.version,
            data = excluded.data,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(name)
    .bind(version)
    .bind(data.to_string())
    .bind(updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// SQLite-backed store. Expects the `state_blobs` migration to have run.
#[derive(Clone)]
pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn get(&self, name: &str) -> Result<Option<StoredBlob>, StoreError> {
        let row = sqlx::query_as::<_, BlobRow>(
            "SELECT version, data FROM state_blobs WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(StoredBlob {
                version: row.version,
                data: serde_json::from_str(&row.data)?,
            })),
            None => Ok(None),
        }
    }

    async fn set(&self, name: &str, version: i64, data: Value) -> Result<(), StoreError> {
        upsert_blob(&self.pool, name, version, &data, Utc::now()).await
    }

    async fn set_many(&self, blobs: Vec<NamedBlob>) -> Result<(), StoreError> {
        let updated_at = Utc::now();
        let mut tx = self.pool.begin().await?;
        for blob in &blobs {
            upsert_blob(&mut *tx, blob.name, blob.version, &blob.data, updated_at).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM state_blobs WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Process-local store, used in tests.
#[derive(Default)]
pub struct MemoryStateStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, name: &str) -> Result<Option<StoredBlob>, StoreError> {
        Ok(self.blobs.read().await.get(name).cloned())
    }

    async fn set(&self, name: &str, version: i64, data: Value) -> Result<(), StoreError> {
        self.blobs
            .write()
            .await
            .insert(name.to_string(), StoredBlob { version, data });
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StoreError> {
        self.blobs.write().await.remove(name);
        Ok(())
    }

    async fn set_many(&self, blobs: Vec<NamedBlob>) -> Result<(), StoreError> {
        let mut stored = self.blobs.write().await;
        for blob in blobs {
            stored.insert(
                blob.name.to_string(),
                StoredBlob {
                    version: blob.version,
                    data: blob.data,
                },
            );
        }
        Ok(())
    }
}
