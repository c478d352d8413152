//! # comanda-core: Pure Business Logic for Comanda
//!
//! This crate is the **heart** of Comanda, an order-taking and billing
//! engine for multi-tenant food service. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Comanda Architecture                           │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │        Presentation (waiter / cashier / kitchen UIs)        │   │
//! │  │                    (outside this repo)                      │   │
//! │  └───────────────────────────┬─────────────────────────────────┘   │
//! │                              │                                     │
//! │  ┌───────────────────────────▼─────────────────────────────────┐   │
//! │  │              ★ comanda-core (THIS CRATE) ★                  │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌──────────┐ ┌───────────┐ ┌───────────────┐  │   │
//! │  │  │ catalog │ │ modifier │ │ promotion │ │      tab      │  │   │
//! │  │  │ Product │ │ validate │ │ schedules │ │ state machine │  │   │
//! │  │  │ Combo   │ │ wizard   │ │ discounts │ │ payment ledger│  │   │
//! │  │  └────┬────┘ └────┬─────┘ └─────┬─────┘ └───────┬───────┘  │   │
//! │  │       └───────────┴──► pricing ◄┴───────────────┘          │   │
//! │  │                                                             │   │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │   │
//! │  └───────────────────────────┬─────────────────────────────────┘   │
//! │                              │                                     │
//! │  ┌───────────────────────────▼─────────────────────────────────┐   │
//! │  │            comanda-db (tenant snapshot store)               │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Products, combos, promotions and per-tenant settings
//! - [`modifier`] - Modifier group validation and selection building
//! - [`wizard`] - Sequential (one group per step) customization flow
//! - [`promotion`] - Schedule-based promotion evaluation
//! - [`pricing`] - Line prices and order totals
//! - [`tab`] - Tab lifecycle, item accumulation, payment ledger
//! - [`state`] - Explicit per-tenant state passed through operations
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every operation is deterministic - same input
//!    and clock = same output. The clock is always an explicit argument.
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Value Semantics**: Tab mutations return a full next snapshot,
//!    so derived totals are never observed half-updated
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use comanda_core::state::TenantState;
//! use comanda_core::tab::{Channel, Identifier, PaymentMethod};
//!
//! let mut state = TenantState::new("barraca-do-ze");
//! let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
//!
//! let tab = state
//!     .open_tab(
//!         Channel::Beach,
//!         "Dona Maria",
//!         Identifier::Table { token: "Tenda 7".to_string() },
//!         now,
//!     )
//!     .unwrap();
//!
//! assert_eq!(tab.total_cents, 0);
//! assert!(tab.payment_logs.is_empty());
//!
//! // Payments go through the state so the stored snapshot is replaced
//! let tab = state
//!     .add_payment(&tab.id, 100, PaymentMethod::Pix, now)
//!     .unwrap();
//! assert_eq!(tab.amount_paid_cents, 100);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod modifier;
pub mod money;
pub mod pricing;
pub mod promotion;
pub mod state;
pub mod tab;
pub mod validation;
pub mod wizard;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use comanda_core::Money` instead of
// `use comanda_core::money::Money`

pub use catalog::{
    Catalog, Category, Combo, Discount, MarmitaConfig, MarmitaSize, ModifierGroup, ModifierOption,
    OperatingShift, Product, Promotion, PromotionTarget, Schedule, Settings,
};
pub use error::{ConfigError, CoreError, SelectionError, TabError, ValidationError};
pub use modifier::{SelectedModifier, SelectionSet};
pub use money::{FeeRate, Money};
pub use pricing::OrderTotals;
pub use promotion::active_promotion_for;
pub use state::TenantState;
pub use tab::{
    Channel, DeliveryInfo, Identifier, ItemStatus, LineRef, OrderItem, PaymentLog, PaymentMethod,
    PaymentStatus, Tab, TabStatus,
};
pub use wizard::ModifierWizard;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items on a single tab.
///
/// Keeps runaway tabs reviewable; can become a per-tenant setting later.
pub const MAX_TAB_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// Catches typo orders (1000 instead of 10) before the kitchen sees them.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Settlement tolerance in centavos.
///
/// A tab closes once `amount_paid >= total - tolerance`, absorbing the
/// one-centavo rounding drift that split payments can accumulate.
pub const SETTLEMENT_TOLERANCE_CENTS: i64 = 1;
