//! # Error Types
//!
//! Domain-specific error types for comanda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  comanda-core errors (this file)                                    │
//! │  ├── ConfigError      - Modifier group misconfiguration             │
//! │  ├── SelectionError   - Customer selections outside group bounds    │
//! │  ├── TabError         - Tab lifecycle / ledger rule violations      │
//! │  ├── ValidationError  - Input validation failures                   │
//! │  └── CoreError        - Umbrella over all of the above              │
//! │                                                                     │
//! │  comanda-db errors (separate crate)                                 │
//! │  └── DbError          - Persistence failures                       │
//! │                                                                     │
//! │  ConfigError   → catalog editor (block save, fix the entry)         │
//! │  SelectionError→ ordering UI (block the line item, adjust choices)  │
//! │  TabError      → caller (operation rejected, no partial effect)     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (group name, tab id, bounds)
//! 3. Errors are enum variants, never String
//! 4. Nothing here is fatal: every error is recoverable by retrying
//!    the operation with corrected input

use thiserror::Error;

// =============================================================================
// Configuration Error
// =============================================================================

/// Modifier group configuration errors.
///
/// Raised when a catalog entry is structurally unusable. These block
/// saving the entry and block pricing any product that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The group has no options at all.
    #[error("modifier group '{group}' has no options")]
    EmptyGroup { group: String },

    /// The group demands more selections than it offers options.
    ///
    /// ## When This Occurs
    /// - A "pick 3 sides" group configured with only 2 side options
    #[error("modifier group '{group}' requires {min} selection(s) but only offers {available} option(s)")]
    InsufficientOptions {
        group: String,
        min: u32,
        available: usize,
    },

    /// `min` exceeds `max`, so no selection count can ever satisfy the group.
    #[error("modifier group '{group}' has minimum {min} greater than maximum {max}")]
    InvertedBounds { group: String, min: u32, max: u32 },
}

// =============================================================================
// Selection Error
// =============================================================================

/// Errors while a customer or staff member builds a line item.
///
/// Surfaced to the ordering UI; the line item is not added until the
/// selections are corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Fewer options chosen than the group's minimum.
    #[error("group '{group}' requires at least {min} selection(s), got {chosen}")]
    BelowMinimum {
        group: String,
        min: u32,
        chosen: usize,
    },

    /// More options chosen than the group's maximum allows.
    #[error("group '{group}' allows at most {max} selection(s), got {chosen}")]
    AboveMaximum {
        group: String,
        max: u32,
        chosen: usize,
    },

    /// A chosen option id does not belong to the group.
    #[error("option '{option}' does not belong to group '{group}'")]
    UnknownOption { group: String, option: String },
}

// =============================================================================
// Tab Error
// =============================================================================

/// Tab lifecycle and payment ledger errors.
///
/// Operations that fail with a `TabError` leave the tab untouched:
/// every mutation computes a full next snapshot or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TabError {
    /// No tab with this id exists for the tenant.
    #[error("tab not found: {tab_id}")]
    TabNotFound { tab_id: String },

    /// The tab is closed or cancelled, so billing mutations are rejected.
    ///
    /// ## When This Occurs
    /// - Adding items after settlement
    /// - Paying into a cancelled tab
    #[error("tab {tab_id} is {status}, operation requires an open tab")]
    TabNotOpen { tab_id: String, status: String },

    /// Cancellation refused.
    ///
    /// A tab with recorded payments cannot be cancelled: there is no
    /// refund or reversal operation in the ledger.
    #[error("tab {tab_id} cannot be cancelled: {reason}")]
    NotCancellable { tab_id: String, reason: String },

    /// Payment amounts must be strictly positive.
    #[error("invalid payment amount: {amount} centavos (must be > 0)")]
    InvalidPaymentAmount { amount: i64 },

    /// Line quantities must be at least 1.
    #[error("invalid quantity: {quantity} (must be >= 1)")]
    InvalidQuantity { quantity: i64 },

    /// Tabs cap their line count to keep orders reviewable.
    #[error("tab cannot have more than {max} items")]
    TooManyItems { max: usize },

    /// No line item with this id exists on the tab.
    #[error("item {item_id} not found on tab {tab_id}")]
    ItemNotFound { tab_id: String, item_id: String },

    /// Preparation status may only advance one step along the chain.
    #[error("item {item_id} cannot move from '{from}' to '{to}'")]
    InvalidStatusTransition {
        item_id: String,
        from: String,
        to: String,
    },

    /// The identifier variant does not fit the order channel.
    ///
    /// ## When This Occurs
    /// - Opening a delivery tab with a table token
    /// - Opening a dine-in tab with a delivery address
    #[error("channel '{channel}' requires a {expected} identifier")]
    IdentifierMismatch {
        channel: String,
        expected: &'static str,
    },

    /// The tenant has disabled this order channel.
    #[error("order channel '{channel}' is not enabled for this tenant")]
    ChannelDisabled { channel: String },

    /// The tenant has disabled this payment method.
    #[error("payment method '{method}' is not enabled for this tenant")]
    PaymentMethodDisabled { method: String },

    /// Input validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when field-level input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed HH:MM time).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for callers that drive the whole engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Tab(#[from] TabError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Product id not present in the tenant's catalog.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Combo id not present in the tenant's catalog.
    #[error("combo not found: {0}")]
    ComboNotFound(String),

    /// Marmitas are disabled or outside their serving window.
    #[error("marmitas are not being served right now")]
    MarmitaUnavailable,

    /// Marmita size id not present in the configuration.
    #[error("marmita size not found: {0}")]
    MarmitaSizeNotFound(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for tab operations.
pub type TabResult<T> = Result<T, TabError>;

// =============================================================================
// Unit Tests
// =============================================================================
