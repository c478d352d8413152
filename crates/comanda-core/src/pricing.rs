//! # Pricing Calculator
//!
//! Derives line prices for customized items and order-level totals.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Product ──► discounted_base(promotion) ──┐                         │
//! │  SelectedModifier surcharges ─────────────┴──► price_line           │
//! │                                                                     │
//! │  OrderItems ──► Σ line totals ──► subtotal                          │
//! │  Channel + Settings ──► service fee (dine-in/beach only)            │
//! │                     ──► delivery fee (delivery only)                │
//! │                                  │                                  │
//! │                                  ▼                                  │
//! │          OrderTotals { subtotal, service fee, delivery fee, total } │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All arithmetic happens in integer centavos; see [`crate::money`].

use serde::{Deserialize, Serialize};

use crate::catalog::{Combo, Discount, MarmitaSize, Product, Promotion, Settings};
use crate::modifier::SelectedModifier;
use crate::money::{FeeRate, Money};
use crate::tab::{Channel, OrderItem};

// =============================================================================
// Order Totals
// =============================================================================

/// Derived order-level amounts, recomputed on every item mutation.
///
/// Invariant: `total == subtotal + service_fee + delivery_fee`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal_cents: i64,
    pub service_fee_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
}

impl OrderTotals {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn service_fee(&self) -> Money {
        Money::from_cents(self.service_fee_cents)
    }

    #[inline]
    pub fn delivery_fee(&self) -> Money {
        Money::from_cents(self.delivery_fee_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Line Pricing
// =============================================================================

/// Applies a promotion's discount to a base price.
///
/// - `Percentage` - `price × (1 − bps/10000)`, clamped at zero
/// - `Fixed` - `max(0, price − value)`
/// - `BadgeOnly` or no promotion - price unchanged
pub fn discounted_base(price: Money, promotion: Option<&Promotion>) -> Money {
    match promotion.map(|p| &p.discount) {
        Some(Discount::Percentage { bps }) => {
            price.saturating_sub(price.percentage_of(FeeRate::from_bps(*bps)))
        }
        Some(Discount::Fixed { amount_cents }) => {
            price.saturating_sub(Money::from_cents(*amount_cents))
        }
        Some(Discount::BadgeOnly) | None => price,
    }
}

/// Prices a customized product line.
///
/// Selections must already have passed the modifier validator; pricing
/// is pure arithmetic over the snapshots.
pub fn price_line(
    product: &Product,
    selections: &[SelectedModifier],
    promotion: Option<&Promotion>,
) -> Money {
    let extras: Money = selections.iter().map(|m| m.price()).sum();
    discounted_base(product.price(), promotion) + extras
}

/// Prices a marmita line: the chosen size plus its extras.
///
/// Marmitas never participate in promotions; their daily price is set
/// directly on the size.
pub fn price_marmita(size: &MarmitaSize, selections: &[SelectedModifier]) -> Money {
    let extras: Money = selections.iter().map(|m| m.price()).sum();
    size.price() + extras
}

/// Prices a combo line: the flat bundle price, regardless of the
/// constituent products. Modifiers do not apply to combos.
#[inline]
pub fn price_combo(combo: &Combo) -> Money {
    combo.price()
}

// =============================================================================
// Order Pricing
// =============================================================================

/// Computes order-level totals for a set of lines on a channel.
///
/// - subtotal = Σ line price × quantity
/// - service fee only when enabled AND the channel is dine-in or beach
/// - delivery fee only on the delivery channel
pub fn price_order(items: &[OrderItem], channel: Channel, settings: &Settings) -> OrderTotals {
    let subtotal: Money = items.iter().map(|i| i.line_total()).sum();

    let service_fee = if settings.service_fee_enabled && channel.carries_service_fee() {
        subtotal.percentage_of(settings.service_fee_rate())
    } else {
        Money::zero()
    };

    let delivery_fee = if channel == Channel::Delivery {
        settings.delivery_fee()
    } else {
        Money::zero()
    };

    OrderTotals {
        subtotal_cents: subtotal.cents(),
        service_fee_cents: service_fee.cents(),
        delivery_fee_cents: delivery_fee.cents(),
        total_cents: (subtotal + service_fee + delivery_fee).cents(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
