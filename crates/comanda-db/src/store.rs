//! # State Store
//!
//! Load → operate → save, with writes serialized per tenant.
//!
//! ## Why Per-Tenant Locks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Waiter adds items          Cashier records a payment               │
//! │        │                            │                               │
//! │        ▼                            ▼                               │
//! │  with_state_mut("ze", ..)    with_state_mut("ze", ..)               │
//! │        │                            │                               │
//! │        └────────► tenant "ze" mutex ◄───────────┘                   │
//! │                   (one writer at a time)                            │
//! │                                                                     │
//! │  Unsynchronized read-modify-write on the same tab loses updates:    │
//! │  both callers would read the same snapshot and the second save      │
//! │  would overwrite the first. The lock makes the second caller        │
//! │  re-read the snapshot the first one saved.                          │
//! │                                                                     │
//! │  Different tenants never contend: tabs are independent aggregates   │
//! │  and each tenant has its own lock and snapshot row.                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::DbResult;
use crate::pool::Database;
use comanda_core::state::TenantState;

/// Serializes engine operations against the snapshot store.
///
/// Cheap to share behind an `Arc`; all access goes through
/// [`with_state`](Self::with_state) / [`with_state_mut`](Self::with_state_mut).
#[derive(Debug)]
pub struct StateStore {
    db: Database,
    /// One async mutex per tenant, created on first touch.
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl StateStore {
    /// Creates a store over an open database.
    pub fn new(db: Database) -> Self {
        StateStore {
            db,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Runs a read-only closure against a tenant's current state.
    ///
    /// Missing tenants read as a fresh empty state; nothing is written.
    pub async fn with_state<F, R>(&self, tenant_id: &str, f: F) -> DbResult<R>
    where
        F: FnOnce(&TenantState) -> R,
    {
        let lock = self.lock_for(tenant_id);
        let _guard = lock.lock().await;

        let state = self.load_or_new(tenant_id).await?;
        Ok(f(&state))
    }

    /// Runs a mutating closure against a tenant's state and saves the
    /// resulting snapshot, all under the tenant's lock.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let tab = store
    ///     .with_state_mut("barraca-do-ze", |state| {
    ///         state.add_payment(&tab_id, 5500, PaymentMethod::Pix, now)
    ///     })
    ///     .await??;
    /// ```
    ///
    /// The closure's own `Result` travels out untouched: a rejected
    /// operation leaves the state it did not change, which is then
    /// saved unchanged.
    pub async fn with_state_mut<F, R>(&self, tenant_id: &str, f: F) -> DbResult<R>
    where
        F: FnOnce(&mut TenantState) -> R,
    {
        let lock = self.lock_for(tenant_id);
        let _guard = lock.lock().await;

        let mut state = self.load_or_new(tenant_id).await?;
        let result = f(&mut state);
        self.db.snapshots().save(&state).await?;

        debug!(tenant_id = %tenant_id, "State mutation committed");
        Ok(result)
    }

    async fn load_or_new(&self, tenant_id: &str) -> DbResult<TenantState> {
        Ok(self
            .db
            .snapshots()
            .load(tenant_id)
            .await?
            .unwrap_or_else(|| TenantState::new(tenant_id)))
    }

    fn lock_for(&self, tenant_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("tenant lock registry poisoned");
        locks
            .entry(tenant_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use chrono::{TimeZone, Utc};
    use comanda_core::catalog::{Category, Product};
    use comanda_core::tab::{Channel, Identifier, PaymentMethod, TabStatus};

    async fn test_store() -> Arc<StateStore> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Arc::new(StateStore::new(db))
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap()
    }

    fn simple_product(price_cents: i64) -> Product {
        Product {
            id: "p1".to_string(),
            tenant_id: "ze".to_string(),
            name: "Batata Frita".to_string(),
            description: None,
            image: None,
            price_cents,
            category: Category::Porcoes,
            modifier_groups: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_mutations_persist_across_calls() {
        let store = test_store().await;

        let tab = store
            .with_state_mut("ze", |state| {
                state.catalog.products.push(simple_product(3500));
                state.open_tab(
                    Channel::DineIn,
                    "Dona Maria",
                    Identifier::Table {
                        token: "Mesa 2".to_string(),
                    },
                    now(),
                )
            })
            .await
            .unwrap()
            .unwrap();

        // A separate call sees the saved snapshot
        let reloaded = store
            .with_state("ze", |state| state.tab(&tab.id).cloned())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.customer_name, "Dona Maria");
    }

    #[tokio::test]
    async fn test_read_does_not_create_tenant() {
        let store = test_store().await;

        let tab_count = store
            .with_state("ghost", |state| state.tabs.len())
            .await
            .unwrap();
        assert_eq!(tab_count, 0);

        let tenants = store.database().snapshots().list_tenants().await.unwrap();
        assert!(tenants.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_payments_do_not_lose_updates() {
        let store = test_store().await;

        let tab = store
            .with_state_mut("ze", |state| {
                state.catalog.products.push(simple_product(10000));
                let tab = state
                    .open_tab(
                        Channel::Takeaway,
                        "Seu João",
                        Identifier::None,
                        now(),
                    )
                    .unwrap();
                let line = state
                    .build_product_line("p1", 1, Vec::new(), now())
                    .unwrap();
                state.add_items(&tab.id, vec![line])
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tab.total_cents, 10000);

        // Two concurrent partial payments against the same tab
        let mut handles = Vec::new();
        for _ in 0..2 {
            let store = Arc::clone(&store);
            let tab_id = tab.id.clone();
            handles.push(tokio::spawn(async move {
                store
                    .with_state_mut("ze", move |state| {
                        state.add_payment(&tab_id, 5000, PaymentMethod::Cash, now())
                    })
                    .await
                    .unwrap()
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let settled = store
            .with_state("ze", |state| state.tab(&tab.id).cloned())
            .await
            .unwrap()
            .unwrap();

        // Both payments landed: 2 × 50.00 covers the 100.00 total
        assert_eq!(settled.amount_paid_cents, 10000);
        assert_eq!(settled.payment_logs.len(), 2);
        assert_eq!(settled.status, TabStatus::Closed);
    }
}
