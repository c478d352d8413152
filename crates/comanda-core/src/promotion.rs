//! # Promotion Evaluator
//!
//! Determines the single promotion applicable to a product at a given
//! instant, according to the recurring schedules on the catalog.
//!
//! ## Matching
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  promotions ──filter──► is_active                                   │
//! │             ──filter──► targets product (by id or category)         │
//! │             ──filter──► schedule matches `now`                      │
//! │                  │                                                  │
//! │                  ▼                                                  │
//! │  Tie-break: product-targeted wins over category-targeted;           │
//! │  within the same target kind, catalog order wins.                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The clock is always an explicit argument, never read from the
//! system, so schedules are testable with fixed timestamps.

use chrono::{DateTime, Utc};

use crate::catalog::{Catalog, Product, Promotion, PromotionTarget};

/// Selects the active promotion for a product at `now`, if any.
///
/// Deterministic for any catalog: a product-targeted promotion always
/// beats a category-targeted one active at the same instant, and
/// catalog order breaks the remaining ties.
///
/// ## Example
/// ```rust,ignore
/// let promo = active_promotion_for(&catalog.promotions, &product, Utc::now());
/// let price = pricing::price_line(&product, &[], promo);
/// ```
pub fn active_promotion_for<'a>(
    promotions: &'a [Promotion],
    product: &Product,
    now: DateTime<Utc>,
) -> Option<&'a Promotion> {
    let applicable =
        |promo: &Promotion| promo.is_active && promo.targets(product) && promo.schedule.matches(now);

    promotions
        .iter()
        .filter(|p| applicable(p))
        .find(|p| matches!(p.target, PromotionTarget::Product { .. }))
        .or_else(|| promotions.iter().find(|p| applicable(p)))
}

impl Catalog {
    /// Convenience wrapper over [`active_promotion_for`] using this
    /// catalog's promotion list.
    pub fn active_promotion(&self, product: &Product, now: DateTime<Utc>) -> Option<&Promotion> {
        active_promotion_for(&self.promotions, product, now)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
