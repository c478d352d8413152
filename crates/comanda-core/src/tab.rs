//! # Tab State Machine & Payment Ledger
//!
//! Owns the tab lifecycle, item accumulation and the payment
//! reconciliation that settles a tab.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │   open()          add_items()              add_payment()            │
//! │     │           (recompute totals)     (append to ledger)           │
//! │     ▼                  │                      │                     │
//! │   OPEN ◄───────────────┘                      ▼                     │
//! │     │                            amount_paid >= total - ε ?         │
//! │     │  cancel()                        │            │               │
//! │     │  (only with empty ledger)        │ no         │ yes           │
//! │     ▼                                  ▼            ▼               │
//! │  CANCELLED                           OPEN        CLOSED             │
//! │                                                                     │
//! │  Item preparation status advances independently of billing:         │
//! │  new → preparing → ready → in-transit → completed                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Value Semantics
//! Every mutation computes the next FULL tab snapshot and returns it;
//! fields are never mutated independently, so a caller can never
//! observe an inconsistent subtotal/total pair. Callers that share a
//! tab between concurrent writers must serialize per tab id (see
//! comanda-db's `StateStore`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::catalog::{Combo, MarmitaSize, Product, Settings};
use crate::error::{TabError, TabResult};
use crate::modifier::SelectedModifier;
use crate::money::Money;
use crate::pricing::{self, OrderTotals};
use crate::validation;
use crate::{MAX_ITEM_QUANTITY, MAX_TAB_ITEMS, SETTLEMENT_TOLERANCE_CENTS};

// =============================================================================
// Channel
// =============================================================================

/// Order fulfillment mode. Determines which fees apply and which
/// identifier variant the tab carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Table service in the dining room ("Salão").
    DineIn,
    /// Tent service on the sand ("Praia").
    Beach,
    /// Delivery to a customer address ("Entrega").
    Delivery,
    /// Counter pickup ("Retirada").
    Takeaway,
}

impl Channel {
    /// Label shown on tickets and dashboards.
    pub fn label(&self) -> &'static str {
        match self {
            Channel::DineIn => "Salão",
            Channel::Beach => "Praia",
            Channel::Delivery => "Entrega",
            Channel::Takeaway => "Retirada",
        }
    }

    /// Service fee applies only to table/tent service.
    #[inline]
    pub fn carries_service_fee(&self) -> bool {
        matches!(self, Channel::DineIn | Channel::Beach)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a payment was taken. The engine records the method; actual
/// card/PIX processing happens outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Pix,
    Card,
    Online,
    MercadoPagoPix,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Pix => "Pix",
            PaymentMethod::Card => "Cartão",
            PaymentMethod::Online => "Pagamento Online",
            PaymentMethod::MercadoPagoPix => "Pix Mercado Pago",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Statuses
// =============================================================================

/// Kitchen-workflow status of one line item.
///
/// Advances along a fixed linear chain, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    New,
    Preparing,
    Ready,
    InTransit,
    Completed,
}

impl ItemStatus {
    /// The next status in the chain, if any.
    pub fn next(&self) -> Option<ItemStatus> {
        match self {
            ItemStatus::New => Some(ItemStatus::Preparing),
            ItemStatus::Preparing => Some(ItemStatus::Ready),
            ItemStatus::Ready => Some(ItemStatus::InTransit),
            ItemStatus::InTransit => Some(ItemStatus::Completed),
            ItemStatus::Completed => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::New => "Novo",
            ItemStatus::Preparing => "Em preparo",
            ItemStatus::Ready => "Pronto",
            ItemStatus::InTransit => "Em Rota",
            ItemStatus::Completed => "Entregue",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Billing status of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabStatus {
    Open,
    Closed,
    Cancelled,
}

impl TabStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TabStatus::Open => "Aberta",
            TabStatus::Closed => "Fechada",
            TabStatus::Cancelled => "Cancelada",
        }
    }
}

impl fmt::Display for TabStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payment progress, tracked alongside the billing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    AwaitingPayment,
    Paid,
    Failed,
}

// =============================================================================
// Identifier
// =============================================================================

/// Delivery destination record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub address: String,
    pub phone: String,
    pub complement: Option<String>,
    pub postal_code: Option<String>,
}

/// Where the order goes, selected by channel.
///
/// Tagged variant instead of an untyped string-or-struct union: a
/// table/tent token for dine-in and beach, a delivery record for
/// delivery, nothing for counter pickup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identifier {
    /// Table number or beach tent token.
    Table { token: String },
    /// Delivery address and contact.
    Delivery { info: DeliveryInfo },
    /// Counter pickup: the customer name is the identifier.
    None,
}

impl Identifier {
    /// The identifier variant a channel requires.
    fn expected_for(channel: Channel) -> &'static str {
        match channel {
            Channel::DineIn | Channel::Beach => "table/tent token",
            Channel::Delivery => "delivery info",
            Channel::Takeaway => "none",
        }
    }

    /// Whether this variant fits the channel.
    fn fits(&self, channel: Channel) -> bool {
        matches!(
            (channel, self),
            (Channel::DineIn, Identifier::Table { .. })
                | (Channel::Beach, Identifier::Table { .. })
                | (Channel::Delivery, Identifier::Delivery { .. })
                | (Channel::Takeaway, Identifier::None)
        )
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// What an order line points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineRef {
    Product { product_id: String },
    Combo { combo_id: String },
    Marmita { size_id: String },
}

/// One priced, quantified entry within a tab.
///
/// `price_at_order_cents` and the name/modifier snapshots are frozen at
/// creation; later catalog edits never change historical lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub line: LineRef,
    pub name_snapshot: String,
    pub quantity: i64,
    #[serde(default)]
    pub selected_modifiers: Vec<SelectedModifier>,
    /// Unit price in centavos, computed once by the pricing calculator.
    pub price_at_order_cents: i64,
    pub status: ItemStatus,
    pub note: Option<String>,
    /// Marmita size label, for build-your-own lunchbox lines.
    pub marmita_size: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Builds a product line from an already-computed unit price.
    pub fn new_product(
        product: &Product,
        quantity: i64,
        selected_modifiers: Vec<SelectedModifier>,
        price_at_order: Money,
        now: DateTime<Utc>,
    ) -> Self {
        OrderItem {
            id: Uuid::new_v4().to_string(),
            line: LineRef::Product {
                product_id: product.id.clone(),
            },
            name_snapshot: product.name.clone(),
            quantity,
            selected_modifiers,
            price_at_order_cents: price_at_order.cents(),
            status: ItemStatus::New,
            note: None,
            marmita_size: None,
            created_at: now,
        }
    }

    /// Builds a combo line at the bundle's flat price.
    pub fn new_combo(combo: &Combo, quantity: i64, now: DateTime<Utc>) -> Self {
        OrderItem {
            id: Uuid::new_v4().to_string(),
            line: LineRef::Combo {
                combo_id: combo.id.clone(),
            },
            name_snapshot: combo.name.clone(),
            quantity,
            selected_modifiers: Vec::new(),
            price_at_order_cents: pricing::price_combo(combo).cents(),
            status: ItemStatus::New,
            note: None,
            marmita_size: None,
            created_at: now,
        }
    }

    /// Builds a build-your-own marmita line for the chosen size.
    pub fn new_marmita(
        size: &MarmitaSize,
        quantity: i64,
        selected_modifiers: Vec<SelectedModifier>,
        now: DateTime<Utc>,
    ) -> Self {
        let price = pricing::price_marmita(size, &selected_modifiers);
        OrderItem {
            id: Uuid::new_v4().to_string(),
            line: LineRef::Marmita {
                size_id: size.id.clone(),
            },
            name_snapshot: format!("Marmita {}", size.label),
            quantity,
            selected_modifiers,
            price_at_order_cents: price.cents(),
            status: ItemStatus::New,
            note: None,
            marmita_size: Some(size.label.clone()),
            created_at: now,
        }
    }

    /// Attaches a free-text note ("sem cebola").
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Tags the line with its marmita size label.
    pub fn with_marmita_size(mut self, label: impl Into<String>) -> Self {
        self.marmita_size = Some(label.into());
        self
    }

    /// Unit price as Money.
    #[inline]
    pub fn price_at_order(&self) -> Money {
        Money::from_cents(self.price_at_order_cents)
    }

    /// Line total: unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price_at_order().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Payment Log
// =============================================================================

/// One entry in the append-only payment audit trail.
///
/// Never mutated or removed once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLog {
    pub id: String,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub timestamp: DateTime<Utc>,
}

impl PaymentLog {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Tab
// =============================================================================

/// A customer order aggregate (a "comanda"), from open to settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub tenant_id: String,
    pub channel: Channel,
    pub customer_name: String,
    pub identifier: Identifier,
    pub waiter_name: Option<String>,

    pub items: Vec<OrderItem>,
    pub status: TabStatus,
    pub payment_status: PaymentStatus,

    pub subtotal_cents: i64,
    pub service_fee_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,

    /// Monotonically non-decreasing sum of recorded payments.
    pub amount_paid_cents: i64,
    pub payment_logs: Vec<PaymentLog>,

    pub people_count: u32,
    pub observation: Option<String>,

    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Tab {
    /// Opens a tab with zero totals and an empty payment ledger.
    ///
    /// The identifier variant must fit the channel: a table/tent token
    /// for dine-in/beach, a delivery record for delivery, none for
    /// takeaway.
    pub fn open(
        tenant_id: impl Into<String>,
        channel: Channel,
        customer_name: impl Into<String>,
        identifier: Identifier,
        now: DateTime<Utc>,
    ) -> TabResult<Tab> {
        let customer_name = customer_name.into();
        validation::validate_name("customer name", &customer_name)?;

        if !identifier.fits(channel) {
            return Err(TabError::IdentifierMismatch {
                channel: channel.label().to_string(),
                expected: Identifier::expected_for(channel),
            });
        }

        Ok(Tab {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.into(),
            channel,
            customer_name,
            identifier,
            waiter_name: None,
            items: Vec::new(),
            status: TabStatus::Open,
            payment_status: PaymentStatus::Pending,
            subtotal_cents: 0,
            service_fee_cents: 0,
            delivery_fee_cents: 0,
            total_cents: 0,
            amount_paid_cents: 0,
            payment_logs: Vec::new(),
            people_count: 1,
            observation: None,
            created_at: now,
            closed_at: None,
        })
    }

    /// Appends items and recomputes every derived total.
    ///
    /// Only valid while open. Adding `[A, B]` then `[C]` yields the same
    /// totals as adding `[A, B, C]` in one call.
    pub fn add_items(&self, new_items: Vec<OrderItem>, settings: &Settings) -> TabResult<Tab> {
        self.ensure_open()?;

        for item in &new_items {
            if item.quantity < 1 || item.quantity > MAX_ITEM_QUANTITY {
                return Err(TabError::InvalidQuantity {
                    quantity: item.quantity,
                });
            }
            if let Some(note) = &item.note {
                validation::validate_note(note)?;
            }
        }

        if self.items.len() + new_items.len() > MAX_TAB_ITEMS {
            return Err(TabError::TooManyItems { max: MAX_TAB_ITEMS });
        }

        let mut next = self.clone();
        next.items.extend(new_items);
        let totals = pricing::price_order(&next.items, self.channel, settings);
        next.apply_totals(totals);
        Ok(next)
    }

    /// Records a payment and settles the tab once the ledger covers the
    /// total within the rounding tolerance of one centavo.
    ///
    /// Overpayment is accepted and recorded as-is; there is no change
    /// or refund modeling.
    pub fn add_payment(
        &self,
        amount_cents: i64,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> TabResult<Tab> {
        self.ensure_open()?;

        if amount_cents <= 0 {
            return Err(TabError::InvalidPaymentAmount {
                amount: amount_cents,
            });
        }

        let mut next = self.clone();
        next.payment_logs.push(PaymentLog {
            id: Uuid::new_v4().to_string(),
            amount_cents,
            method,
            timestamp: now,
        });
        next.amount_paid_cents += amount_cents;

        if next.amount_paid_cents >= next.total_cents - SETTLEMENT_TOLERANCE_CENTS {
            next.status = TabStatus::Closed;
            next.payment_status = PaymentStatus::Paid;
            next.closed_at = Some(now);
        }

        Ok(next)
    }

    /// Advances one item's preparation status a single step along the
    /// chain `new → preparing → ready → in-transit → completed`.
    ///
    /// Permitted on closed tabs (the kitchen finishes what billing
    /// already settled) but not on cancelled ones. Backward, repeated
    /// or skipping moves are rejected.
    pub fn update_item_status(&self, item_id: &str, new_status: ItemStatus) -> TabResult<Tab> {
        if self.status == TabStatus::Cancelled {
            return Err(TabError::TabNotOpen {
                tab_id: self.id.clone(),
                status: self.status.label().to_string(),
            });
        }

        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| TabError::ItemNotFound {
                tab_id: self.id.clone(),
                item_id: item_id.to_string(),
            })?;

        let current = self.items[index].status;
        if current.next() != Some(new_status) {
            return Err(TabError::InvalidStatusTransition {
                item_id: item_id.to_string(),
                from: current.label().to_string(),
                to: new_status.label().to_string(),
            });
        }

        let mut next = self.clone();
        next.items[index].status = new_status;
        Ok(next)
    }

    /// Cancels an open tab with an empty payment ledger.
    ///
    /// Tabs with recorded payments cannot be cancelled: the ledger has
    /// no reversal operation.
    pub fn cancel(&self, now: DateTime<Utc>) -> TabResult<Tab> {
        self.ensure_open()?;

        if self.amount_paid_cents > 0 {
            return Err(TabError::NotCancellable {
                tab_id: self.id.clone(),
                reason: format!(
                    "{} already paid",
                    Money::from_cents(self.amount_paid_cents)
                ),
            });
        }

        let mut next = self.clone();
        next.status = TabStatus::Cancelled;
        next.closed_at = Some(now);
        Ok(next)
    }

    /// Updates the headcount (for per-person bill splitting displays).
    /// Clamped to at least one.
    pub fn with_people_count(&self, count: u32) -> Tab {
        let mut next = self.clone();
        next.people_count = count.max(1);
        next
    }

    /// Remaining balance, never negative.
    pub fn balance_due(&self) -> Money {
        Money::from_cents((self.total_cents - self.amount_paid_cents).max(0))
    }

    /// Whether the ledger covers the total (within tolerance).
    pub fn is_settled(&self) -> bool {
        self.amount_paid_cents >= self.total_cents - SETTLEMENT_TOLERANCE_CENTS
    }

    /// Total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    fn ensure_open(&self) -> TabResult<()> {
        if self.status != TabStatus::Open {
            return Err(TabError::TabNotOpen {
                tab_id: self.id.clone(),
                status: self.status.label().to_string(),
            });
        }
        Ok(())
    }

    fn apply_totals(&mut self, totals: OrderTotals) {
        self.subtotal_cents = totals.subtotal_cents;
        self.service_fee_cents = totals.service_fee_cents;
        self.delivery_fee_cents = totals.delivery_fee_cents;
        self.total_cents = totals.total_cents;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
