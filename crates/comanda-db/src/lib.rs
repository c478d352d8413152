//! # comanda-db: Persistence Layer for Comanda
//!
//! This crate provides durable storage for the Comanda engine. It uses
//! SQLite (via sqlx) as a key-value store of tenant state snapshots.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Comanda Data Flow                              │
//! │                                                                     │
//! │  Caller (waiter/cashier surface)                                    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   comanda-db (THIS CRATE)                   │   │
//! │  │                                                             │   │
//! │  │  ┌──────────────┐  ┌────────────────┐  ┌───────────────┐   │   │
//! │  │  │  StateStore  │  │   Snapshot     │  │  Migrations   │   │   │
//! │  │  │ (store.rs)   │─►│  Repository    │  │  (embedded)   │   │   │
//! │  │  │ per-tenant   │  │ load/save blob │  │ 001_init.sql  │   │   │
//! │  │  │ write locks  │  │                │  │               │   │   │
//! │  │  └──────────────┘  └────────────────┘  └───────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database (one JSON snapshot row per tenant)                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Snapshot repository (the key-value contract)
//! - [`store`] - Per-tenant serialized load/operate/save
//!
//! ## Usage
//!
//! ```rust,ignore
//! use comanda_db::{Database, DbConfig, StateStore};
//!
//! let db = Database::new(DbConfig::new("./data/comanda.db")).await?;
//! let store = StateStore::new(db);
//!
//! let tab = store
//!     .with_state_mut("barraca-do-ze", |state| {
//!         state.open_tab(channel, "Dona Maria", identifier, Utc::now())
//!     })
//!     .await??;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};
pub use repository::snapshot::SnapshotRepository;
pub use store::StateStore;
