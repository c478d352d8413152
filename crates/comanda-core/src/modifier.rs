//! # Modifier Validator
//!
//! Cardinality rules for modifier groups, enforced at two moments:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Configuration time (catalog editor)                                │
//! │    validate_group() ──► EmptyGroup / InsufficientOptions /          │
//! │                         InvertedBounds                              │
//! │                                                                     │
//! │  Selection time (customer or staff building a line)                 │
//! │    validate_selection() ──► BelowMinimum / AboveMaximum             │
//! │                                                                     │
//! │  Two UX flows share this module unchanged:                          │
//! │    • wizard::ModifierWizard  - one group per step                   │
//! │    • validate_all()          - all groups at submit time            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The validator knows nothing about presentation order; only the
//! orchestration differs between the two flows.

use serde::{Deserialize, Serialize};

use crate::catalog::ModifierGroup;
use crate::error::{ConfigError, SelectionError};
use crate::money::Money;

// =============================================================================
// Selected Modifier Snapshot
// =============================================================================

/// Snapshot of one chosen option.
///
/// Group and option names plus the price are copied at selection time,
/// so later catalog edits never retroactively change historical orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedModifier {
    pub group_id: String,
    pub group_name: String,
    pub option_id: String,
    pub option_name: String,
    pub price_cents: i64,
}

impl SelectedModifier {
    /// Returns the surcharge as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Configuration-Time Validation
// =============================================================================

/// Validates a modifier group's configuration.
///
/// ## Rules
/// - The group must have at least one option
/// - The group must offer at least `min` options
/// - `min` must not exceed `max`
///
/// Failing groups are a catalog problem, not a runtime one: the editor
/// must fix the entry, and the engine refuses to price products that
/// carry an invalid group.
pub fn validate_group(group: &ModifierGroup) -> Result<(), ConfigError> {
    if group.options.is_empty() {
        return Err(ConfigError::EmptyGroup {
            group: group.name.clone(),
        });
    }

    if (group.options.len() as u32) < group.min {
        return Err(ConfigError::InsufficientOptions {
            group: group.name.clone(),
            min: group.min,
            available: group.options.len(),
        });
    }

    if group.min > group.max {
        return Err(ConfigError::InvertedBounds {
            group: group.name.clone(),
            min: group.min,
            max: group.max,
        });
    }

    Ok(())
}

// =============================================================================
// Selection-Time Validation
// =============================================================================

/// Validates the chosen option ids against one group's bounds.
///
/// ## Example
/// ```rust
/// use comanda_core::catalog::{ModifierGroup, ModifierOption};
/// use comanda_core::modifier::validate_selection;
///
/// let group = ModifierGroup {
///     id: "g1".to_string(),
///     name: "Sabores".to_string(),
///     min: 1,
///     max: 2,
///     options: vec![
///         ModifierOption { id: "o1".to_string(), name: "Calabresa".to_string(), extra_price_cents: 0 },
///         ModifierOption { id: "o2".to_string(), name: "Portuguesa".to_string(), extra_price_cents: 500 },
///     ],
/// };
///
/// assert!(validate_selection(&group, &["o1"]).is_ok());
/// assert!(validate_selection(&group, &[] as &[&str]).is_err()); // below minimum
/// ```
pub fn validate_selection<S: AsRef<str>>(
    group: &ModifierGroup,
    chosen_option_ids: &[S],
) -> Result<(), SelectionError> {
    for id in chosen_option_ids {
        if group.option(id.as_ref()).is_none() {
            return Err(SelectionError::UnknownOption {
                group: group.name.clone(),
                option: id.as_ref().to_string(),
            });
        }
    }

    let chosen = chosen_option_ids.len();

    if chosen < group.min as usize {
        return Err(SelectionError::BelowMinimum {
            group: group.name.clone(),
            min: group.min,
            chosen,
        });
    }

    if chosen > group.max as usize {
        return Err(SelectionError::AboveMaximum {
            group: group.name.clone(),
            max: group.max,
            chosen,
        });
    }

    Ok(())
}

/// Batch-submit validation: every group at once (simultaneous form flow).
///
/// The wizard flow reaches the same checks one group at a time; see
/// [`crate::wizard::ModifierWizard`].
pub fn validate_all(
    groups: &[ModifierGroup],
    selections: &[SelectedModifier],
) -> Result<(), SelectionError> {
    for group in groups {
        let chosen: Vec<&str> = selections
            .iter()
            .filter(|m| m.group_id == group.id)
            .map(|m| m.option_id.as_str())
            .collect();
        validate_selection(group, &chosen)?;
    }
    Ok(())
}

// =============================================================================
// Selection Set
// =============================================================================

/// Accumulates option choices while a line item is being customized.
///
/// ## Toggle Semantics
/// - Re-toggling a selected option deselects it
/// - A full `max == 1` group replaces the prior choice (radio button)
/// - A full `max > 1` group rejects further choices (checkbox with cap)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    selected: Vec<SelectedModifier>,
}

impl SelectionSet {
    /// Creates an empty selection set.
    pub fn new() -> Self {
        SelectionSet {
            selected: Vec::new(),
        }
    }

    /// Toggles an option on or off.
    ///
    /// ## Returns
    /// - `Ok(())` - selection updated
    /// - `Err(SelectionError::UnknownOption)` - option not in the group
    /// - `Err(SelectionError::AboveMaximum)` - multi-choice group is full
    pub fn toggle(
        &mut self,
        group: &ModifierGroup,
        option_id: &str,
    ) -> Result<(), SelectionError> {
        let option = group
            .option(option_id)
            .ok_or_else(|| SelectionError::UnknownOption {
                group: group.name.clone(),
                option: option_id.to_string(),
            })?;

        // Re-toggling deselects
        if self.is_selected(option_id) {
            self.selected.retain(|m| m.option_id != option_id);
            return Ok(());
        }

        let snapshot = SelectedModifier {
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            option_id: option.id.clone(),
            option_name: option.name.clone(),
            price_cents: option.extra_price_cents,
        };

        let in_group = self.count_in(&group.id);
        if in_group < group.max as usize {
            self.selected.push(snapshot);
            Ok(())
        } else if group.is_single_choice() {
            // Radio-button semantics: the new choice replaces the old one
            self.selected.retain(|m| m.group_id != group.id);
            self.selected.push(snapshot);
            Ok(())
        } else {
            Err(SelectionError::AboveMaximum {
                group: group.name.clone(),
                max: group.max,
                chosen: in_group + 1,
            })
        }
    }

    /// Whether an option is currently selected.
    pub fn is_selected(&self, option_id: &str) -> bool {
        self.selected.iter().any(|m| m.option_id == option_id)
    }

    /// Number of selections within one group.
    pub fn count_in(&self, group_id: &str) -> usize {
        self.selected
            .iter()
            .filter(|m| m.group_id == group_id)
            .count()
    }

    /// Option ids currently selected within one group.
    pub fn option_ids_in(&self, group_id: &str) -> Vec<&str> {
        self.selected
            .iter()
            .filter(|m| m.group_id == group_id)
            .map(|m| m.option_id.as_str())
            .collect()
    }

    /// Sum of every selected surcharge.
    pub fn extras_total(&self) -> Money {
        self.selected.iter().map(|m| m.price()).sum()
    }

    /// Borrow the accumulated snapshots.
    pub fn selections(&self) -> &[SelectedModifier] {
        &self.selected
    }

    /// Consume the set, yielding the snapshots for the order line.
    pub fn into_selections(self) -> Vec<SelectedModifier> {
        self.selected
    }

    /// Whether nothing has been selected yet.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModifierOption;

    fn option(id: &str, name: &str, extra: i64) -> ModifierOption {
        ModifierOption {
            id: id.to_string(),
            name: name.to_string(),
            extra_price_cents: extra,
        }
    }

    fn group(id: &str, name: &str, min: u32, max: u32, options: Vec<ModifierOption>) -> ModifierGroup {
        ModifierGroup {
            id: id.to_string(),
            name: name.to_string(),
            min,
            max,
            options,
        }
    }

    fn temperatura() -> ModifierGroup {
        group(
            "g_temp",
            "Temperatura",
            1,
            1,
            vec![option("gelada", "Gelada", 0), option("natural", "Natural", 0)],
        )
    }

    fn adicionais() -> ModifierGroup {
        group(
            "g_extra",
            "Adicionais",
            0,
            3,
            vec![
                option("cheddar", "Queijo Cheddar", 800),
                option("bacon", "Bacon Picado", 600),
                option("maionese", "Maionese da Casa", 350),
                option("cebola", "Cebola Caramelizada", 400),
            ],
        )
    }

    #[test]
    fn test_validate_group_accepts_well_formed() {
        assert!(validate_group(&temperatura()).is_ok());
        assert!(validate_group(&adicionais()).is_ok());
    }

    #[test]
    fn test_validate_group_rejects_empty() {
        let g = group("g", "Vazio", 0, 1, Vec::new());
        assert_eq!(
            validate_group(&g),
            Err(ConfigError::EmptyGroup {
                group: "Vazio".to_string()
            })
        );
    }

    #[test]
    fn test_validate_group_rejects_insufficient_options() {
        let g = group(
            "g",
            "Acompanhamentos",
            3,
            3,
            vec![option("a", "Arroz", 0), option("b", "Feijão", 0)],
        );
        assert_eq!(
            validate_group(&g),
            Err(ConfigError::InsufficientOptions {
                group: "Acompanhamentos".to_string(),
                min: 3,
                available: 2,
            })
        );
    }

    #[test]
    fn test_validate_group_rejects_inverted_bounds() {
        let g = group(
            "g",
            "Borda",
            2,
            1,
            vec![option("a", "Catupiry", 1200), option("b", "Cheddar", 1200)],
        );
        assert_eq!(
            validate_group(&g),
            Err(ConfigError::InvertedBounds {
                group: "Borda".to_string(),
                min: 2,
                max: 1,
            })
        );
    }

    #[test]
    fn test_validate_selection_bounds() {
        let g = adicionais();
        assert!(validate_selection(&g, &[] as &[&str]).is_ok());
        assert!(validate_selection(&g, &["cheddar", "bacon"]).is_ok());
        assert!(matches!(
            validate_selection(&g, &["cheddar", "bacon", "maionese", "cebola"]),
            Err(SelectionError::AboveMaximum { .. })
        ));

        let required = temperatura();
        assert!(matches!(
            validate_selection(&required, &[] as &[&str]),
            Err(SelectionError::BelowMinimum { .. })
        ));
    }

    #[test]
    fn test_validate_selection_unknown_option() {
        let g = temperatura();
        assert!(matches!(
            validate_selection(&g, &["quente"]),
            Err(SelectionError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_toggle_radio_replaces_prior_choice() {
        let g = temperatura();
        let mut set = SelectionSet::new();

        set.toggle(&g, "gelada").unwrap();
        assert!(set.is_selected("gelada"));

        // Choosing the other option replaces, never errors
        set.toggle(&g, "natural").unwrap();
        assert!(!set.is_selected("gelada"));
        assert!(set.is_selected("natural"));
        assert_eq!(set.count_in("g_temp"), 1);
    }

    #[test]
    fn test_toggle_checkbox_rejects_over_cap() {
        let g = adicionais();
        let mut set = SelectionSet::new();

        set.toggle(&g, "cheddar").unwrap();
        set.toggle(&g, "bacon").unwrap();
        set.toggle(&g, "maionese").unwrap();

        assert!(matches!(
            set.toggle(&g, "cebola"),
            Err(SelectionError::AboveMaximum { .. })
        ));
        assert_eq!(set.count_in("g_extra"), 3);
    }

    #[test]
    fn test_toggle_deselects() {
        let g = adicionais();
        let mut set = SelectionSet::new();

        set.toggle(&g, "cheddar").unwrap();
        set.toggle(&g, "cheddar").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_extras_total() {
        let g = adicionais();
        let mut set = SelectionSet::new();

        set.toggle(&g, "cheddar").unwrap();
        set.toggle(&g, "bacon").unwrap();
        assert_eq!(set.extras_total().cents(), 1400);
    }

    #[test]
    fn test_validate_all_checks_every_group() {
        let groups = vec![temperatura(), adicionais()];
        let mut set = SelectionSet::new();

        // Nothing selected: Temperatura requires one choice
        assert!(matches!(
            validate_all(&groups, set.selections()),
            Err(SelectionError::BelowMinimum { .. })
        ));

        set.toggle(&groups[0], "gelada").unwrap();
        assert!(validate_all(&groups, set.selections()).is_ok());
    }

    #[test]
    fn test_selection_snapshot_freezes_names_and_prices() {
        let g = adicionais();
        let mut set = SelectionSet::new();
        set.toggle(&g, "cheddar").unwrap();

        let snapshot = &set.selections()[0];
        assert_eq!(snapshot.group_name, "Adicionais");
        assert_eq!(snapshot.option_name, "Queijo Cheddar");
        assert_eq!(snapshot.price_cents, 800);
    }
}
