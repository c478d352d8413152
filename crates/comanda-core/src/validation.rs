//! # Validation Module
//!
//! Field-level validation shared by the catalog editor surface and the
//! tab operations.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Presentation (outside this repo)                          │
//! │  ├── Basic format checks, immediate user feedback                   │
//! │          │                                                          │
//! │          ▼                                                          │
//! │  Layer 2: THIS MODULE + modifier/tab rules                          │
//! │  ├── Field constraints (this file)                                  │
//! │  └── Business rules (modifier.rs, tab.rs)                           │
//! │          │                                                          │
//! │          ▼                                                          │
//! │  Layer 3: Persistence (whole-snapshot writes, nothing partial)      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length for display names (products, combos, customers).
const MAX_NAME_LEN: usize = 200;

/// Maximum length for free-text notes on order lines.
const MAX_NOTE_LEN: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use comanda_core::validation::validate_name;
///
/// assert!(validate_name("customer name", "Dona Maria").is_ok());
/// assert!(validate_name("customer name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an optional free-text note ("sem cebola, capricha no queijo").
///
/// ## Rules
/// - May be empty
/// - Must be at most 500 characters
pub fn validate_note(note: &str) -> ValidationResult<()> {
    if note.len() > MAX_NOTE_LEN {
        return Err(ValidationError::TooLong {
            field: "note".to_string(),
            max: MAX_NOTE_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in centavos.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, zero-surcharge options)
///
/// ## Example
/// ```rust
/// use comanda_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1200).is_ok());  // R$ 12.00
/// assert!(validate_price_cents(0).is_ok());     // free
/// assert!(validate_price_cents(-100).is_err()); // invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a fee rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - Typical service fees are 1000 (10%)
pub fn validate_fee_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "service fee".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
