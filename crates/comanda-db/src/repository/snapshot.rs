//! # Snapshot Repository
//!
//! Load/save a tenant's full engine state as an opaque JSON blob.
//!
//! ## The Key-Value Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    tenant_snapshots                                 │
//! │                                                                     │
//! │  tenant_id (PK)   │ payload (JSON TenantState)   │ updated_at       │
//! │  ─────────────────┼──────────────────────────────┼───────────       │
//! │  barraca-do-ze    │ {"tenantId":..,"tabs":[..]}  │ 2026-08-..       │
//! │  acai-mania       │ {"tenantId":..,"tabs":[..]}  │ 2026-08-..       │
//! │                                                                     │
//! │  Saves replace the whole row: the store never patches fields        │
//! │  inside the payload, so a reader can never observe a snapshot       │
//! │  mixing two versions of the same tenant.                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use comanda_core::state::TenantState;

/// Repository for tenant state snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Creates a new SnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Saves (inserts or replaces) a tenant's snapshot.
    pub async fn save(&self, state: &TenantState) -> DbResult<()> {
        let payload = serde_json::to_string(state)?;
        let now = Utc::now().to_rfc3339();

        debug!(
            tenant_id = %state.tenant_id,
            bytes = payload.len(),
            tabs = state.tabs.len(),
            "Saving tenant snapshot"
        );

        sqlx::query(
            r#"
            INSERT INTO tenant_snapshots (tenant_id, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(tenant_id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&state.tenant_id)
        .bind(&payload)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Loads a tenant's snapshot, if one exists.
    pub async fn load(&self, tenant_id: &str) -> DbResult<Option<TenantState>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM tenant_snapshots WHERE tenant_id = ?1")
                .bind(tenant_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((payload,)) => {
                let state: TenantState = serde_json::from_str(&payload)?;
                debug!(tenant_id = %tenant_id, tabs = state.tabs.len(), "Loaded tenant snapshot");
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    /// Lists every tenant with a stored snapshot.
    pub async fn list_tenants(&self) -> DbResult<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT tenant_id FROM tenant_snapshots ORDER BY tenant_id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Deletes a tenant's snapshot.
    ///
    /// ## Returns
    /// `true` if a snapshot existed and was removed.
    pub async fn delete(&self, tenant_id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM tenant_snapshots WHERE tenant_id = ?1")
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use comanda_core::tab::{Channel, Identifier};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn demo_state(tenant_id: &str) -> TenantState {
        let mut state = TenantState::new(tenant_id);
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        state
            .open_tab(
                Channel::Beach,
                "Dona Maria",
                Identifier::Table {
                    token: "Tenda 7".to_string(),
                },
                now,
            )
            .unwrap();
        state
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let db = test_db().await;
        let state = demo_state("barraca-do-ze");

        db.snapshots().save(&state).await.unwrap();
        let loaded = db.snapshots().load("barraca-do-ze").await.unwrap().unwrap();

        assert_eq!(loaded, state);
        assert_eq!(loaded.tabs.len(), 1);
        assert_eq!(loaded.tabs[0].customer_name, "Dona Maria");
    }

    #[tokio::test]
    async fn test_load_missing_tenant_is_none() {
        let db = test_db().await;
        assert!(db.snapshots().load("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_snapshot() {
        let db = test_db().await;
        let mut state = demo_state("barraca-do-ze");
        db.snapshots().save(&state).await.unwrap();

        let now = Utc.with_ymd_and_hms(2026, 1, 10, 13, 0, 0).unwrap();
        state
            .open_tab(
                Channel::Takeaway,
                "Seu João",
                Identifier::None,
                now,
            )
            .unwrap();
        db.snapshots().save(&state).await.unwrap();

        let loaded = db.snapshots().load("barraca-do-ze").await.unwrap().unwrap();
        assert_eq!(loaded.tabs.len(), 2);
    }

    #[tokio::test]
    async fn test_list_and_delete_tenants() {
        let db = test_db().await;
        db.snapshots().save(&demo_state("acai-mania")).await.unwrap();
        db.snapshots()
            .save(&demo_state("barraca-do-ze"))
            .await
            .unwrap();

        let tenants = db.snapshots().list_tenants().await.unwrap();
        assert_eq!(tenants, vec!["acai-mania", "barraca-do-ze"]);

        assert!(db.snapshots().delete("acai-mania").await.unwrap());
        assert!(!db.snapshots().delete("acai-mania").await.unwrap());

        let tenants = db.snapshots().list_tenants().await.unwrap();
        assert_eq!(tenants, vec!["barraca-do-ze"]);
    }
}
