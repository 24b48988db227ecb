use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tokio::sync::Mutex;
use tracing::info;

use corpay_core::domain::approval::{ApprovalFlow, FlowId};
use corpay_core::flows::default_flows;

use super::{remove_flow, upsert_flow, ApprovalFlowRepository, RepositoryError};
use crate::DbPool;

pub const APPROVAL_FLOWS_KEY: &str = "corporate_pay_approval_flows";

/// String values keyed by a fixed name, backed by the `kv_store` table.
#[derive(Clone)]
pub struct SqlKeyValueStore {
    pool: DbPool,
}

impl SqlKeyValueStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| row.try_get::<String, _>("value"))
            .transpose()
            .map_err(|e| RepositoryError::Decode(e.to_string()))
    }

    pub async fn put(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Keeps the whole flow list as one JSON document under
/// [`APPROVAL_FLOWS_KEY`]. Reading an absent key writes the seed list first.
pub struct KvApprovalFlowRepository {
    store: SqlKeyValueStore,
    seed: Vec<ApprovalFlow>,
    write_lock: Mutex<()>,
}

impl KvApprovalFlowRepository {
    pub fn new(pool: DbPool) -> Self {
        Self::with_seed(pool, default_flows())
    }

    pub fn with_seed(pool: DbPool, seed: Vec<ApprovalFlow>) -> Self {
        Self { store: SqlKeyValueStore::new(pool), seed, write_lock: Mutex::new(()) }
    }

    /// Drops the stored list so the next read seeds again.
    pub async fn reset(&self) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(APPROVAL_FLOWS_KEY).await?;
        Ok(())
    }

    async fn read_or_seed(&self) -> Result<Vec<ApprovalFlow>, RepositoryError> {
        match self.store.get(APPROVAL_FLOWS_KEY).await? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| RepositoryError::Decode(e.to_string()))
            }
            None => {
                let flows = self.seed.clone();
                self.write(&flows).await?;
                info!(
                    event_name = "storage.flows.seeded",
                    correlation_id = "storage",
                    flow_count = flows.len(),
                    "seeded empty approval flow store"
                );
                Ok(flows)
            }
        }
    }

    async fn write(&self, flows: &[ApprovalFlow]) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(flows).map_err(|e| RepositoryError::Encode(e.to_string()))?;
        self.store.put(APPROVAL_FLOWS_KEY, &raw).await
    }
}

#[async_trait]
impl ApprovalFlowRepository for KvApprovalFlowRepository {
    async fn load(&self) -> Result<Vec<ApprovalFlow>, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        self.read_or_seed().await
    }

    async fn save(&self, flow: ApprovalFlow) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut flows = self.read_or_seed().await?;
        upsert_flow(&mut flows, flow);
        self.write(&flows).await
    }

    async fn delete(&self, id: &FlowId) -> Result<bool, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut flows = self.read_or_seed().await?;
        if !remove_flow(&mut flows, id) {
            return Ok(false);
        }
        self.write(&flows).await?;
        Ok(true)
    }
}
