//! # Catalog Model
//!
//! Per-tenant menu description: products, modifier groups, combos,
//! promotions and fee settings.
//!
//! ## Sharing Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Sharing                                │
//! │                                                                     │
//! │  The catalog is read-mostly. Tab operations borrow it immutably;    │
//! │  catalog edits build a NEW Catalog value and swap it in whole.      │
//! │  A pricing calculation therefore never observes a half-updated      │
//! │  modifier group.                                                    │
//! │                                                                     │
//! │  Catalog ──► Modifier Validator ──┐                                 │
//! │         └──► Promotion Evaluator ─┴──► Pricing Calculator           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products are immutable once referenced by an order line: the line
//! carries its own price/name snapshots, so catalog edits only affect
//! future lines.

use serde::{Deserialize, Serialize};
use std::fmt;

use chrono::{DateTime, Timelike, Utc};

use crate::error::{CoreResult, ValidationError};
use crate::modifier;
use crate::money::{FeeRate, Money};
use crate::tab::{Channel, PaymentMethod};
use crate::validation;

// =============================================================================
// Category
// =============================================================================

/// Fixed menu category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bebidas,
    Porcoes,
    Pratos,
    Sobremesas,
    Combos,
    Pizzas,
    Marmitas,
    Acai,
}

impl Category {
    /// All categories, in menu display order.
    pub const ALL: [Category; 8] = [
        Category::Bebidas,
        Category::Porcoes,
        Category::Pratos,
        Category::Sobremesas,
        Category::Combos,
        Category::Pizzas,
        Category::Marmitas,
        Category::Acai,
    ];

    /// Menu label shown to customers.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Bebidas => "Bebidas",
            Category::Porcoes => "Porções",
            Category::Pratos => "Pratos",
            Category::Sobremesas => "Sobremesas",
            Category::Combos => "Combos",
            Category::Pizzas => "Pizzas",
            Category::Marmitas => "Marmitas",
            Category::Acai => "Açaí",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Modifier Groups
// =============================================================================

/// One selectable option inside a modifier group.
///
/// `extra_price_cents` may be zero ("Sem Cebola") and is non-negative
/// by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierOption {
    pub id: String,
    pub name: String,
    pub extra_price_cents: i64,
}

impl ModifierOption {
    /// Returns the surcharge as Money.
    #[inline]
    pub fn extra_price(&self) -> Money {
        Money::from_cents(self.extra_price_cents)
    }
}

/// A named set of options with a required selection-count range.
///
/// ## Invariant
/// `0 <= min <= max` and `options.len() >= min`, checked by
/// [`crate::modifier::validate_group`] before the group is priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierGroup {
    pub id: String,
    pub name: String,
    pub min: u32,
    pub max: u32,
    pub options: Vec<ModifierOption>,
}

impl ModifierGroup {
    /// Looks up an option by id.
    pub fn option(&self, option_id: &str) -> Option<&ModifierOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// A group with `max == 1` behaves like a radio button: choosing a
    /// new option replaces the previous one.
    #[inline]
    pub fn is_single_choice(&self) -> bool {
        self.max == 1
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this product belongs to.
    pub tenant_id: String,

    /// Display name shown on the menu and on order lines.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Optional image reference (upload handling lives outside the engine).
    pub image: Option<String>,

    /// Base price in centavos.
    pub price_cents: i64,

    /// Menu category.
    pub category: Category,

    /// Modifier groups; empty for simple items.
    #[serde(default)]
    pub modifier_groups: Vec<ModifierGroup>,
}

impl Product {
    /// Returns the base price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the product needs a customization flow before it can be
    /// added to a tab.
    #[inline]
    pub fn has_modifiers(&self) -> bool {
        !self.modifier_groups.is_empty()
    }

    /// Looks up a modifier group by id.
    pub fn group(&self, group_id: &str) -> Option<&ModifierGroup> {
        self.modifier_groups.iter().find(|g| g.id == group_id)
    }
}

// =============================================================================
// Combo
// =============================================================================

/// A bundle of products sold at a flat price.
///
/// Combos are priced by their own `price_cents` regardless of the
/// constituent products, and take no modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub product_ids: Vec<String>,
    pub image: Option<String>,
}

impl Combo {
    /// Returns the flat price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Promotion
// =============================================================================

/// What a promotion applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromotionTarget {
    /// A single product by id.
    Product { product_id: String },
    /// Every product in a category.
    Category { category: Category },
}

/// When a promotion is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// Active at any instant.
    Always,
    /// Active on one weekday every week (0 = Sunday .. 6 = Saturday).
    Daily { weekday: u8 },
    /// Active on one day of every month (1-31).
    Monthly { day: u8 },
    /// Active on one calendar date every year, formatted `MM-DD`.
    Yearly { date: String },
}

impl Schedule {
    /// Whether the schedule is active at `now`.
    pub fn matches(&self, now: DateTime<Utc>) -> bool {
        use chrono::Datelike;
        match self {
            Schedule::Always => true,
            Schedule::Daily { weekday } => {
                now.weekday().num_days_from_sunday() == *weekday as u32
            }
            Schedule::Monthly { day } => now.day() == *day as u32,
            Schedule::Yearly { date } => now.format("%m-%d").to_string() == *date,
        }
    }
}

/// What the promotion does to the price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discount {
    /// Percentage off the base price, in basis points (1000 = 10%).
    Percentage { bps: u32 },
    /// Fixed amount off the base price, clamped at zero.
    Fixed { amount_cents: i64 },
    /// Presentation only: the badge shows, the price is unchanged.
    BadgeOnly,
}

/// A time-scheduled discount rule targeting a product or a category.
///
/// Title, badge and color are presentation data carried along for the
/// menu; they never affect pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: String,
    pub tenant_id: String,
    pub title: String,
    pub description: String,
    pub badge: String,
    pub color: String,
    pub target: PromotionTarget,
    pub schedule: Schedule,
    pub discount: Discount,
    pub is_active: bool,
}

impl Promotion {
    /// Whether this promotion targets the given product (directly or
    /// through its category).
    pub fn targets(&self, product: &Product) -> bool {
        match &self.target {
            PromotionTarget::Product { product_id } => *product_id == product.id,
            PromotionTarget::Category { category } => *category == product.category,
        }
    }
}

// =============================================================================
// Operating Shifts
// =============================================================================

/// A daily service window, `HH:MM` to `HH:MM`.
///
/// Windows may wrap past midnight ("19:00".."03:00").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingShift {
    pub id: String,
    pub label: String,
    pub start_time: String,
    pub end_time: String,
    pub enabled: bool,
}

impl OperatingShift {
    /// Whether `now` falls inside the window.
    ///
    /// Malformed times never match; [`Catalog::validate`] rejects them
    /// before they are saved.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let (start, end) = match (
            parse_hhmm(&self.start_time),
            parse_hhmm(&self.end_time),
        ) {
            (Some(s), Some(e)) => (s, e),
            _ => return false,
        };
        let curr = now.hour() * 60 + now.minute();
        if start <= end {
            curr >= start && curr <= end
        } else {
            // Window wraps past midnight
            curr >= start || curr <= end
        }
    }
}

/// Parses `HH:MM` into minutes since midnight.
fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

// =============================================================================
// Marmita Configuration
// =============================================================================

/// One sellable marmita size (P/M/G) with its own price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarmitaSize {
    pub id: String,
    pub label: String,
    pub price_cents: i64,
}

impl MarmitaSize {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Build-your-own lunchbox configuration.
///
/// Marmitas are not regular products: the tenant configures a daily
/// menu with sizes and optional extras, served inside a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarmitaConfig {
    pub enabled: bool,
    pub daily_menu: String,
    pub ingredients: Vec<String>,
    pub image: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub sizes: Vec<MarmitaSize>,
    #[serde(default)]
    pub modifier_groups: Vec<ModifierGroup>,
}

impl MarmitaConfig {
    /// Whether marmitas can be ordered at `now`.
    pub fn is_serving(&self, now: DateTime<Utc>) -> bool {
        if !self.enabled {
            return false;
        }
        let window = OperatingShift {
            id: String::new(),
            label: String::new(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            enabled: true,
        };
        window.contains(now)
    }

    /// Looks up a size by id.
    pub fn size(&self, size_id: &str) -> Option<&MarmitaSize> {
        self.sizes.iter().find(|s| s.id == size_id)
    }
}

impl Default for MarmitaConfig {
    fn default() -> Self {
        MarmitaConfig {
            enabled: false,
            daily_menu: String::new(),
            ingredients: Vec::new(),
            image: None,
            start_time: "10:30".to_string(),
            end_time: "14:30".to_string(),
            sizes: Vec::new(),
            modifier_groups: Vec::new(),
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Per-tenant operational settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub tenant_id: String,

    /// Whether the establishment is currently taking orders.
    pub is_open: bool,

    pub company_name: String,
    pub cnpj: String,
    pub whatsapp: Option<String>,
    pub address: Option<String>,

    /// Delivery operating windows.
    #[serde(default)]
    pub operating_shifts: Vec<OperatingShift>,

    /// Build-your-own lunchbox configuration.
    #[serde(default)]
    pub marmita_config: MarmitaConfig,

    /// Service fee in basis points (1000 = 10%).
    pub service_fee_bps: u32,

    /// Service fee master switch.
    pub service_fee_enabled: bool,

    /// Flat delivery fee in centavos.
    pub delivery_fee_cents: i64,

    /// Payment methods the cashier may record.
    pub enabled_payment_methods: Vec<PaymentMethod>,

    /// Channels tabs may be opened on.
    pub enabled_channels: Vec<Channel>,
}

impl Settings {
    /// Returns the service fee rate.
    #[inline]
    pub fn service_fee_rate(&self) -> FeeRate {
        FeeRate::from_bps(self.service_fee_bps)
    }

    /// Returns the delivery fee as Money.
    #[inline]
    pub fn delivery_fee(&self) -> Money {
        Money::from_cents(self.delivery_fee_cents)
    }

    /// Whether tabs may be opened on this channel.
    pub fn channel_enabled(&self, channel: Channel) -> bool {
        self.enabled_channels.contains(&channel)
    }

    /// Whether payments may be recorded with this method.
    pub fn payment_method_enabled(&self, method: PaymentMethod) -> bool {
        self.enabled_payment_methods.contains(&method)
    }

    /// Whether `now` falls inside any enabled operating shift.
    pub fn is_within_shifts(&self, now: DateTime<Utc>) -> bool {
        self.operating_shifts
            .iter()
            .any(|shift| shift.enabled && shift.contains(now))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tenant_id: String::new(),
            is_open: true,
            company_name: String::new(),
            cnpj: String::new(),
            whatsapp: None,
            address: None,
            operating_shifts: Vec::new(),
            marmita_config: MarmitaConfig::default(),
            service_fee_bps: 1000,
            service_fee_enabled: true,
            delivery_fee_cents: 700,
            enabled_payment_methods: vec![
                PaymentMethod::Cash,
                PaymentMethod::Pix,
                PaymentMethod::Card,
            ],
            enabled_channels: vec![
                Channel::Beach,
                Channel::DineIn,
                Channel::Delivery,
                Channel::Takeaway,
            ],
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Per-tenant catalog aggregate.
///
/// Edits must replace the whole value; tab operations only ever borrow
/// it immutably.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub combos: Vec<Combo>,
    pub promotions: Vec<Promotion>,
    pub settings: Settings,
}

impl Catalog {
    /// Looks up a product by id.
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Looks up a combo by id.
    pub fn combo(&self, combo_id: &str) -> Option<&Combo> {
        self.combos.iter().find(|c| c.id == combo_id)
    }

    /// Validates the whole catalog before it is persisted.
    ///
    /// Checks field-level rules (names, prices, schedule values, shift
    /// time formats) and every modifier group's cardinality invariant.
    /// The first problem found is returned; the editor fixes it and
    /// retries.
    pub fn validate(&self) -> CoreResult<()> {
        for product in &self.products {
            validation::validate_name("product name", &product.name)?;
            validation::validate_price_cents(product.price_cents)?;
            for group in &product.modifier_groups {
                modifier::validate_group(group)?;
            }
        }

        for combo in &self.combos {
            validation::validate_name("combo name", &combo.name)?;
            validation::validate_price_cents(combo.price_cents)?;
        }

        for promo in &self.promotions {
            validation::validate_name("promotion title", &promo.title)?;
            validate_schedule(&promo.schedule)?;
        }

        validation::validate_fee_bps(self.settings.service_fee_bps)?;
        validation::validate_price_cents(self.settings.delivery_fee_cents)?;
        for shift in &self.settings.operating_shifts {
            validate_time("shift start", &shift.start_time)?;
            validate_time("shift end", &shift.end_time)?;
        }
        for group in &self.settings.marmita_config.modifier_groups {
            modifier::validate_group(group)?;
        }

        Ok(())
    }
}

/// Checks schedule values are inside their calendar ranges.
fn validate_schedule(schedule: &Schedule) -> Result<(), ValidationError> {
    match schedule {
        Schedule::Always => Ok(()),
        Schedule::Daily { weekday } => {
            if *weekday > 6 {
                return Err(ValidationError::OutOfRange {
                    field: "schedule weekday".to_string(),
                    min: 0,
                    max: 6,
                });
            }
            Ok(())
        }
        Schedule::Monthly { day } => {
            if *day < 1 || *day > 31 {
                return Err(ValidationError::OutOfRange {
                    field: "schedule day".to_string(),
                    min: 1,
                    max: 31,
                });
            }
            Ok(())
        }
        Schedule::Yearly { date } => {
            let valid = date.len() == 5
                && date.as_bytes()[2] == b'-'
                && date[..2].parse::<u8>().map(|m| (1..=12).contains(&m)) == Ok(true)
                && date[3..].parse::<u8>().map(|d| (1..=31).contains(&d)) == Ok(true);
            if !valid {
                return Err(ValidationError::InvalidFormat {
                    field: "schedule date".to_string(),
                    reason: "expected MM-DD".to_string(),
                });
            }
            Ok(())
        }
    }
}

/// Checks an `HH:MM` time string.
fn validate_time(field: &str, value: &str) -> Result<(), ValidationError> {
    if parse_hhmm(value).is_none() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{value}' is not a valid HH:MM time"),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Acai.to_string(), "Açaí");
        assert_eq!(Category::Porcoes.to_string(), "Porções");
        assert_eq!(Category::ALL.len(), 8);
    }

    #[test]
    fn test_schedule_daily_matches_weekday() {
        // 2026-08-02 is a Sunday
        let sunday = at(2026, 8, 2, 12, 0);
        let monday = at(2026, 8, 3, 12, 0);

        let schedule = Schedule::Daily { weekday: 0 };
        assert!(schedule.matches(sunday));
        assert!(!schedule.matches(monday));
    }

    #[test]
    fn test_schedule_monthly_matches_day() {
        let schedule = Schedule::Monthly { day: 25 };
        assert!(schedule.matches(at(2026, 3, 25, 9, 0)));
        assert!(schedule.matches(at(2026, 11, 25, 9, 0)));
        assert!(!schedule.matches(at(2026, 3, 24, 9, 0)));
        assert!(!schedule.matches(at(2026, 3, 26, 9, 0)));
    }

    #[test]
    fn test_schedule_yearly_matches_date() {
        let schedule = Schedule::Yearly {
            date: "06-12".to_string(), // Dia dos Namorados
        };
        assert!(schedule.matches(at(2026, 6, 12, 20, 0)));
        assert!(!schedule.matches(at(2026, 6, 13, 20, 0)));
        assert!(!schedule.matches(at(2026, 12, 6, 20, 0)));
    }

    #[test]
    fn test_shift_contains_plain_window() {
        let shift = OperatingShift {
            id: "s1".to_string(),
            label: "Almoço".to_string(),
            start_time: "11:00".to_string(),
            end_time: "15:00".to_string(),
            enabled: true,
        };
        assert!(shift.contains(at(2026, 1, 10, 12, 30)));
        assert!(shift.contains(at(2026, 1, 10, 11, 0)));
        assert!(!shift.contains(at(2026, 1, 10, 15, 1)));
        assert!(!shift.contains(at(2026, 1, 10, 9, 0)));
    }

    #[test]
    fn test_shift_contains_overnight_window() {
        let shift = OperatingShift {
            id: "s2".to_string(),
            label: "Jantar".to_string(),
            start_time: "19:00".to_string(),
            end_time: "03:00".to_string(),
            enabled: true,
        };
        assert!(shift.contains(at(2026, 1, 10, 22, 0)));
        assert!(shift.contains(at(2026, 1, 10, 2, 0)));
        assert!(!shift.contains(at(2026, 1, 10, 12, 0)));
    }

    #[test]
    fn test_settings_is_within_shifts_skips_disabled() {
        let mut settings = Settings::default();
        settings.operating_shifts = vec![OperatingShift {
            id: "s1".to_string(),
            label: "Almoço".to_string(),
            start_time: "11:00".to_string(),
            end_time: "15:00".to_string(),
            enabled: false,
        }];
        assert!(!settings.is_within_shifts(at(2026, 1, 10, 12, 0)));
    }

    #[test]
    fn test_marmita_serving_window() {
        let config = MarmitaConfig {
            enabled: true,
            sizes: vec![MarmitaSize {
                id: "m1".to_string(),
                label: "P".to_string(),
                price_cents: 1800,
            }],
            ..MarmitaConfig::default()
        };
        assert!(config.is_serving(at(2026, 1, 10, 12, 0)));
        assert!(!config.is_serving(at(2026, 1, 10, 16, 0)));

        let disabled = MarmitaConfig::default();
        assert!(!disabled.is_serving(at(2026, 1, 10, 12, 0)));
    }

    #[test]
    fn test_catalog_validate_rejects_bad_group() {
        let mut catalog = Catalog::default();
        catalog.products.push(Product {
            id: "p1".to_string(),
            tenant_id: "t1".to_string(),
            name: "Pizza Gigante".to_string(),
            description: None,
            image: None,
            price_cents: 6500,
            category: Category::Pizzas,
            modifier_groups: vec![ModifierGroup {
                id: "g1".to_string(),
                name: "Sabores".to_string(),
                min: 1,
                max: 2,
                options: Vec::new(),
            }],
        });
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_catalog_validate_rejects_bad_schedule() {
        let mut catalog = Catalog::default();
        catalog.promotions.push(Promotion {
            id: "promo1".to_string(),
            tenant_id: "t1".to_string(),
            title: "Dia do Açaí".to_string(),
            description: String::new(),
            badge: "PROMO".to_string(),
            color: "#7c3aed".to_string(),
            target: PromotionTarget::Category {
                category: Category::Acai,
            },
            schedule: Schedule::Daily { weekday: 9 },
            discount: Discount::Percentage { bps: 1000 },
            is_active: true,
        });
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_promotion_target_wire_format() {
        let target = PromotionTarget::Category {
            category: Category::Acai,
        };
        let json = serde_json::to_string(&target).unwrap();
        assert_eq!(json, r#"{"kind":"category","category":"acai"}"#);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert!(settings.service_fee_enabled);
        assert_eq!(settings.service_fee_bps, 1000);
        assert_eq!(settings.delivery_fee_cents, 700);
        assert!(settings.channel_enabled(Channel::Beach));
        assert!(settings.payment_method_enabled(PaymentMethod::Pix));
        assert!(!settings.payment_method_enabled(PaymentMethod::MercadoPagoPix));
    }
}
