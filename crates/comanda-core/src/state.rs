//! # Tenant State
//!
//! Explicit per-tenant aggregate passed into each engine operation and
//! returned updated. There is no ambient or global state: callers own
//! persistence and re-injection of this value.
//!
//! ## Operation Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  load TenantState ──► operation(&mut state, input) ──► save state   │
//! │                                                                     │
//! │  open_tab ───────────┐                                              │
//! │  add_items ──────────┤  look up the tab by id, apply the pure       │
//! │  add_payment ────────┤  Tab operation, replace the snapshot,        │
//! │  update_item_status ─┤  return the updated Tab to the caller        │
//! │  cancel_tab ─────────┘                                              │
//! │                                                                     │
//! │  Unknown tab ids are an error (TabNotFound), never a silent no-op.  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line building composes the whole read path: catalog lookup, group
//! configuration check, selection validation, promotion evaluation and
//! pricing, yielding an [`OrderItem`] ready for [`add_items`](TenantState::add_items).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, TabError, TabResult};
use crate::modifier::{self, SelectedModifier};
use crate::promotion;
use crate::tab::{Channel, Identifier, ItemStatus, OrderItem, PaymentMethod, Tab};
use crate::{pricing, wizard};

/// Everything the engine knows about one tenant: the catalog and every
/// tab, open or settled. Serialized whole as the persistence snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantState {
    pub tenant_id: String,
    pub catalog: Catalog,
    pub tabs: Vec<Tab>,
}

impl TenantState {
    /// Creates an empty state for a tenant.
    pub fn new(tenant_id: impl Into<String>) -> Self {
        let tenant_id = tenant_id.into();
        let mut catalog = Catalog::default();
        catalog.settings.tenant_id = tenant_id.clone();
        TenantState {
            tenant_id,
            catalog,
            tabs: Vec::new(),
        }
    }

    /// Looks up a tab by id.
    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    /// Tabs still collecting items or payments.
    pub fn open_tabs(&self) -> impl Iterator<Item = &Tab> {
        self.tabs
            .iter()
            .filter(|t| t.status == crate::tab::TabStatus::Open)
    }

    fn tab_index(&self, tab_id: &str) -> TabResult<usize> {
        self.tabs
            .iter()
            .position(|t| t.id == tab_id)
            .ok_or_else(|| TabError::TabNotFound {
                tab_id: tab_id.to_string(),
            })
    }

    // =========================================================================
    // Catalog Surface
    // =========================================================================

    /// Replaces the catalog wholesale after validating it.
    ///
    /// Catalog edits (products, combos, promotions, settings) always go
    /// through here: the new value is checked first and swapped in
    /// whole, so pricing never observes a half-updated modifier group.
    /// Invalid catalogs are rejected and the previous one stays.
    pub fn replace_catalog(&mut self, catalog: Catalog) -> CoreResult<()> {
        catalog.validate()?;
        self.catalog = catalog;
        Ok(())
    }

    // =========================================================================
    // Order Surface
    // =========================================================================

    /// Opens a tab on an enabled channel and returns it.
    pub fn open_tab(
        &mut self,
        channel: Channel,
        customer_name: impl Into<String>,
        identifier: Identifier,
        now: DateTime<Utc>,
    ) -> TabResult<Tab> {
        if !self.catalog.settings.channel_enabled(channel) {
            return Err(TabError::ChannelDisabled {
                channel: channel.label().to_string(),
            });
        }

        let tab = Tab::open(self.tenant_id.clone(), channel, customer_name, identifier, now)?;
        self.tabs.push(tab.clone());
        Ok(tab)
    }

    /// Appends items to an open tab, recomputing totals.
    pub fn add_items(&mut self, tab_id: &str, items: Vec<OrderItem>) -> TabResult<Tab> {
        let index = self.tab_index(tab_id)?;
        let next = self.tabs[index].add_items(items, &self.catalog.settings)?;
        self.tabs[index] = next.clone();
        Ok(next)
    }

    /// Records a payment with an enabled method; the tab settles once
    /// the ledger covers its total.
    pub fn add_payment(
        &mut self,
        tab_id: &str,
        amount_cents: i64,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> TabResult<Tab> {
        if !self.catalog.settings.payment_method_enabled(method) {
            return Err(TabError::PaymentMethodDisabled {
                method: method.label().to_string(),
            });
        }

        let index = self.tab_index(tab_id)?;
        let next = self.tabs[index].add_payment(amount_cents, method, now)?;
        self.tabs[index] = next.clone();
        Ok(next)
    }

    /// Advances one item's kitchen status.
    pub fn update_item_status(
        &mut self,
        tab_id: &str,
        item_id: &str,
        new_status: ItemStatus,
    ) -> TabResult<Tab> {
        let index = self.tab_index(tab_id)?;
        let next = self.tabs[index].update_item_status(item_id, new_status)?;
        self.tabs[index] = next.clone();
        Ok(next)
    }

    /// Cancels an unpaid open tab.
    pub fn cancel_tab(&mut self, tab_id: &str, now: DateTime<Utc>) -> TabResult<Tab> {
        let index = self.tab_index(tab_id)?;
        let next = self.tabs[index].cancel(now)?;
        self.tabs[index] = next.clone();
        Ok(next)
    }

    /// Updates a tab's headcount.
    pub fn set_people_count(&mut self, tab_id: &str, count: u32) -> TabResult<Tab> {
        let index = self.tab_index(tab_id)?;
        let next = self.tabs[index].with_people_count(count);
        self.tabs[index] = next.clone();
        Ok(next)
    }

    // =========================================================================
    // Line Building
    // =========================================================================

    /// Builds a priced product line from validated selections.
    ///
    /// Runs the full read path: group configuration check (ill-formed
    /// catalogs refuse to price), selection validation, promotion
    /// evaluation at `now`, then line pricing.
    pub fn build_product_line(
        &self,
        product_id: &str,
        quantity: i64,
        selections: Vec<SelectedModifier>,
        now: DateTime<Utc>,
    ) -> CoreResult<OrderItem> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        for group in &product.modifier_groups {
            modifier::validate_group(group)?;
        }
        modifier::validate_all(&product.modifier_groups, &selections)?;

        let promo = promotion::active_promotion_for(&self.catalog.promotions, product, now);
        let price = pricing::price_line(product, &selections, promo);

        Ok(OrderItem::new_product(product, quantity, selections, price, now))
    }

    /// Builds a flat-priced combo line.
    pub fn build_combo_line(
        &self,
        combo_id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> CoreResult<OrderItem> {
        let combo = self
            .catalog
            .combo(combo_id)
            .ok_or_else(|| CoreError::ComboNotFound(combo_id.to_string()))?;
        Ok(OrderItem::new_combo(combo, quantity, now))
    }

    /// Builds a marmita line for the chosen size, if marmitas are being
    /// served at `now`.
    pub fn build_marmita_line(
        &self,
        size_id: &str,
        quantity: i64,
        selections: Vec<SelectedModifier>,
        now: DateTime<Utc>,
    ) -> CoreResult<OrderItem> {
        let config = &self.catalog.settings.marmita_config;
        if !config.is_serving(now) {
            return Err(CoreError::MarmitaUnavailable);
        }

        let size = config
            .size(size_id)
            .ok_or_else(|| CoreError::MarmitaSizeNotFound(size_id.to_string()))?;

        for group in &config.modifier_groups {
            modifier::validate_group(group)?;
        }
        modifier::validate_all(&config.modifier_groups, &selections)?;

        Ok(OrderItem::new_marmita(size, quantity, selections, now))
    }

    /// Starts a sequential customization wizard for a product.
    pub fn start_wizard(&self, product_id: &str) -> CoreResult<wizard::ModifierWizard<'_>> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        Ok(wizard::ModifierWizard::new(&product.modifier_groups)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        Category, Discount, MarmitaConfig, MarmitaSize, ModifierGroup, ModifierOption, Product,
        Promotion, PromotionTarget, Schedule,
    };
    use crate::modifier::SelectionSet;
    use crate::tab::TabStatus;
    use chrono::TimeZone;

    fn noon(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    fn demo_state() -> TenantState {
        let mut state = TenantState::new("t1");
        state.catalog.products.push(Product {
            id: "prato1".to_string(),
            tenant_id: "t1".to_string(),
            name: "PF de Frango Grelhado".to_string(),
            description: None,
            image: None,
            price_cents: 3800,
            category: Category::Pratos,
            modifier_groups: vec![ModifierGroup {
                id: "dg1".to_string(),
                name: "Ponto do Frango".to_string(),
                min: 1,
                max: 1,
                options: vec![
                    ModifierOption {
                        id: "do1".to_string(),
                        name: "Ao Ponto".to_string(),
                        extra_price_cents: 0,
                    },
                    ModifierOption {
                        id: "do2".to_string(),
                        name: "Bem Passado".to_string(),
                        extra_price_cents: 0,
                    },
                ],
            }],
        });
        state.catalog.combos.push(crate::catalog::Combo {
            id: "combo1".to_string(),
            tenant_id: "t1".to_string(),
            name: "Combo Família".to_string(),
            description: "3 Pratos + Sobremesa".to_string(),
            price_cents: 9900,
            product_ids: vec!["prato1".to_string(), "prato1".to_string()],
            image: None,
        });
        state
    }

    fn pick(state: &TenantState, product_id: &str, option_id: &str) -> Vec<SelectedModifier> {
        let product = state.catalog.product(product_id).unwrap();
        let mut set = SelectionSet::new();
        set.toggle(&product.modifier_groups[0], option_id).unwrap();
        set.into_selections()
    }

    #[test]
    fn test_full_order_flow() {
        let mut state = demo_state();

        let tab = state
            .open_tab(
                Channel::DineIn,
                "Dona Maria",
                Identifier::Table {
                    token: "Mesa 4".to_string(),
                },
                noon(10),
            )
            .unwrap();

        let selections = pick(&state, "prato1", "do1");
        let line = state
            .build_product_line("prato1", 1, selections, noon(10))
            .unwrap();

        let tab = state.add_items(&tab.id, vec![line]).unwrap();
        assert_eq!(tab.subtotal_cents, 3800);
        assert_eq!(tab.service_fee_cents, 380);
        assert_eq!(tab.total_cents, 4180);

        let tab = state
            .add_payment(&tab.id, 4180, PaymentMethod::Pix, noon(10))
            .unwrap();
        assert_eq!(tab.status, TabStatus::Closed);

        // The stored snapshot reflects the settlement
        assert_eq!(state.tab(&tab.id).unwrap().status, TabStatus::Closed);
    }

    #[test]
    fn test_replace_catalog_rejects_invalid_and_keeps_previous() {
        let mut state = demo_state();
        let good = state.catalog.clone();

        let mut bad = state.catalog.clone();
        bad.products[0].modifier_groups[0].options.clear();

        assert!(state.replace_catalog(bad).is_err());
        assert_eq!(state.catalog, good);
    }

    #[test]
    fn test_unknown_tab_is_an_error() {
        let mut state = demo_state();
        assert!(matches!(
            state.add_payment("missing", 100, PaymentMethod::Cash, noon(1)),
            Err(TabError::TabNotFound { .. })
        ));
        assert!(matches!(
            state.add_items("missing", Vec::new()),
            Err(TabError::TabNotFound { .. })
        ));
    }

    #[test]
    fn test_disabled_channel_rejected() {
        let mut state = demo_state();
        state.catalog.settings.enabled_channels = vec![Channel::DineIn];

        assert!(matches!(
            state.open_tab(
                Channel::Delivery,
                "João",
                Identifier::Delivery {
                    info: crate::tab::DeliveryInfo {
                        address: "Rua A, 1".to_string(),
                        phone: "11 90000-0000".to_string(),
                        complement: None,
                        postal_code: None,
                    },
                },
                noon(1),
            ),
            Err(TabError::ChannelDisabled { .. })
        ));
    }

    #[test]
    fn test_disabled_payment_method_rejected() {
        let mut state = demo_state();
        let tab = state
            .open_tab(
                Channel::DineIn,
                "João",
                Identifier::Table {
                    token: "Mesa 1".to_string(),
                },
                noon(1),
            )
            .unwrap();

        assert!(matches!(
            state.add_payment(&tab.id, 100, PaymentMethod::MercadoPagoPix, noon(1)),
            Err(TabError::PaymentMethodDisabled { .. })
        ));
    }

    #[test]
    fn test_line_building_applies_monthly_promotion() {
        let mut state = demo_state();
        state.catalog.promotions.push(Promotion {
            id: "m25".to_string(),
            tenant_id: "t1".to_string(),
            title: "Dia 25".to_string(),
            description: String::new(),
            badge: "PROMO".to_string(),
            color: "#f43f5e".to_string(),
            target: PromotionTarget::Product {
                product_id: "prato1".to_string(),
            },
            schedule: Schedule::Monthly { day: 25 },
            discount: Discount::Percentage { bps: 1000 },
            is_active: true,
        });

        let selections = pick(&state, "prato1", "do1");
        let on_the_25th = state
            .build_product_line("prato1", 1, selections.clone(), noon(25))
            .unwrap();
        assert_eq!(on_the_25th.price_at_order_cents, 3420); // 10% off 38.00

        let on_the_24th = state
            .build_product_line("prato1", 1, selections, noon(24))
            .unwrap();
        assert_eq!(on_the_24th.price_at_order_cents, 3800);
    }

    #[test]
    fn test_line_building_rejects_unmet_minimum() {
        let state = demo_state();
        assert!(matches!(
            state.build_product_line("prato1", 1, Vec::new(), noon(1)),
            Err(CoreError::Selection(_))
        ));
    }

    #[test]
    fn test_line_building_refuses_invalid_group_config() {
        let mut state = demo_state();
        // Corrupt the group: min demands more than it offers
        state.catalog.products[0].modifier_groups[0].min = 5;

        let selections = pick(&state, "prato1", "do1");
        assert!(matches!(
            state.build_product_line("prato1", 1, selections, noon(1)),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_product_and_combo() {
        let state = demo_state();
        assert!(matches!(
            state.build_product_line("ghost", 1, Vec::new(), noon(1)),
            Err(CoreError::ProductNotFound(_))
        ));
        assert!(matches!(
            state.build_combo_line("ghost", 1, noon(1)),
            Err(CoreError::ComboNotFound(_))
        ));
    }

    #[test]
    fn test_combo_line_is_flat_priced() {
        let state = demo_state();
        let line = state.build_combo_line("combo1", 2, noon(1)).unwrap();
        assert_eq!(line.price_at_order_cents, 9900);
        assert_eq!(line.line_total().cents(), 19800);
    }

    #[test]
    fn test_marmita_line_respects_serving_window() {
        let mut state = demo_state();
        state.catalog.settings.marmita_config = MarmitaConfig {
            enabled: true,
            daily_menu: "Tempero caseiro".to_string(),
            ingredients: vec!["Arroz".to_string(), "Feijão".to_string()],
            image: None,
            start_time: "10:30".to_string(),
            end_time: "14:30".to_string(),
            sizes: vec![MarmitaSize {
                id: "m2".to_string(),
                label: "M".to_string(),
                price_cents: 2200,
            }],
            modifier_groups: Vec::new(),
        };

        let line = state
            .build_marmita_line("m2", 1, Vec::new(), noon(1))
            .unwrap();
        assert_eq!(line.price_at_order_cents, 2200);
        assert_eq!(line.marmita_size.as_deref(), Some("M"));

        let evening = Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap();
        assert!(matches!(
            state.build_marmita_line("m2", 1, Vec::new(), evening),
            Err(CoreError::MarmitaUnavailable)
        ));
    }

    #[test]
    fn test_wizard_from_state() {
        let state = demo_state();
        let mut wiz = state.start_wizard("prato1").unwrap();
        wiz.toggle("do2").unwrap();
        let selections = wiz.finish().unwrap();
        assert_eq!(selections[0].option_name, "Bem Passado");
    }
}
