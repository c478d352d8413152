//! # Modifier Wizard
//!
//! Sequential customization flow for composite products (pizzas, açaí,
//! marmitas): one modifier group per step, validated before advancing.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Passo 1/3: Sabores      ──toggle──► advance() validates group 1    │
//! │  Passo 2/3: Borda        ──toggle──► advance() validates group 2    │
//! │  Passo 3/3: Extras       ──toggle──► finish()  validates them all   │
//! │                                          │                          │
//! │                                          ▼                          │
//! │                     Vec<SelectedModifier> for the order line        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The simultaneous-form flow calls [`crate::modifier::validate_all`]
//! once at submit time instead; both run the exact same checks.

use crate::catalog::ModifierGroup;
use crate::error::{ConfigError, SelectionError};
use crate::modifier::{self, SelectedModifier, SelectionSet};

/// Step-by-step builder over a product's modifier groups.
#[derive(Debug, Clone)]
pub struct ModifierWizard<'a> {
    groups: &'a [ModifierGroup],
    step: usize,
    selections: SelectionSet,
}

impl<'a> ModifierWizard<'a> {
    /// Starts a wizard over the given groups.
    ///
    /// Every group's configuration is checked up front: the engine
    /// refuses to build lines for products whose groups are invalid.
    pub fn new(groups: &'a [ModifierGroup]) -> Result<Self, ConfigError> {
        for group in groups {
            modifier::validate_group(group)?;
        }
        Ok(ModifierWizard {
            groups,
            step: 0,
            selections: SelectionSet::new(),
        })
    }

    /// The group currently presented, if any step remains.
    pub fn current_group(&self) -> Option<&'a ModifierGroup> {
        self.groups.get(self.step)
    }

    /// Zero-based index of the current step.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Total number of steps.
    #[inline]
    pub fn total_steps(&self) -> usize {
        self.groups.len()
    }

    /// Whether the wizard is on its final step.
    pub fn is_last_step(&self) -> bool {
        self.groups.is_empty() || self.step + 1 == self.groups.len()
    }

    /// Toggles an option within the current step's group.
    pub fn toggle(&mut self, option_id: &str) -> Result<(), SelectionError> {
        let group = self
            .current_group()
            .ok_or_else(|| SelectionError::UnknownOption {
                group: "(no current step)".to_string(),
                option: option_id.to_string(),
            })?;
        self.selections.toggle(group, option_id)
    }

    /// Validates the current step and moves to the next one.
    ///
    /// ## Returns
    /// - `Ok(true)` - moved to the next step
    /// - `Ok(false)` - already on the last step; call [`finish`](Self::finish)
    /// - `Err(BelowMinimum)` - the current group's minimum is unmet
    pub fn advance(&mut self) -> Result<bool, SelectionError> {
        if let Some(group) = self.current_group() {
            let chosen = self.selections.option_ids_in(&group.id);
            modifier::validate_selection(group, &chosen)?;
        }
        if self.is_last_step() {
            return Ok(false);
        }
        self.step += 1;
        Ok(true)
    }

    /// Moves back one step. Selections made so far are kept.
    pub fn back(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    /// Validates every group and yields the selection snapshots.
    pub fn finish(self) -> Result<Vec<SelectedModifier>, SelectionError> {
        modifier::validate_all(self.groups, self.selections.selections())?;
        Ok(self.selections.into_selections())
    }

    /// Borrow the accumulated selections (for live price display).
    pub fn selections(&self) -> &SelectionSet {
        &self.selections
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

    /// The half-and-half pizza from the demo menu: up to two flavors,
    /// optional stuffed crust.
    fn pizza_groups() -> Vec<ModifierGroup> {
        vec![
            ModifierGroup {
                id: "pz_g1".to_string(),
                name: "Escolha os Sabores (Até 2)".to_string(),
                min: 1,
                max: 2,
                options: vec![
                    option("pzo1", "Calabresa Tradicional", 0),
                    option("pzo2", "Portuguesa Especial", 500),
                    option("pzo3", "Frango com Catupiry", 300),
                ],
            },
            ModifierGroup {
                id: "pz_g2".to_string(),
                name: "Borda Recheada".to_string(),
                min: 0,
                max: 1,
                options: vec![
                    option("pzo6", "Borda de Catupiry", 1200),
                    option("pzo7", "Borda de Chocolate", 1500),
                ],
            },
        ]
    }

    #[test]
    fn test_wizard_rejects_invalid_config() {
        let groups = vec![ModifierGroup {
            id: "g".to_string(),
            name: "Sabores".to_string(),
            min: 1,
            max: 2,
            options: Vec::new(),
        }];
        assert!(matches!(
            ModifierWizard::new(&groups),
            Err(ConfigError::EmptyGroup { .. })
        ));
    }

    #[test]
    fn test_wizard_blocks_advance_below_minimum() {
        let groups = pizza_groups();
        let mut wizard = ModifierWizard::new(&groups).unwrap();

        // Zero flavors chosen: the required step must not advance
        assert!(matches!(
            wizard.advance(),
            Err(SelectionError::BelowMinimum { .. })
        ));
        assert_eq!(wizard.step(), 0);
    }

    #[test]
    fn test_wizard_happy_path() {
        let groups = pizza_groups();
        let mut wizard = ModifierWizard::new(&groups).unwrap();
        assert_eq!(wizard.total_steps(), 2);

        wizard.toggle("pzo1").unwrap();
        wizard.toggle("pzo2").unwrap();
        assert_eq!(wizard.advance(), Ok(true));

        // Borda is optional; skip it
        assert!(wizard.is_last_step());
        assert_eq!(wizard.advance(), Ok(false));

        let selections = wizard.finish().unwrap();
        assert_eq!(selections.len(), 2);
        let extras: i64 = selections.iter().map(|m| m.price_cents).sum();
        assert_eq!(extras, 500);
    }

    #[test]
    fn test_wizard_finish_rejects_unmet_later_group() {
        let mut groups = pizza_groups();
        // Make the second step required as well
        groups[1].min = 1;

        let mut wizard = ModifierWizard::new(&groups).unwrap();
        wizard.toggle("pzo1").unwrap();
        wizard.advance().unwrap();

        // Jumped to finish without picking a crust
        assert!(matches!(
            wizard.finish(),
            Err(SelectionError::BelowMinimum { .. })
        ));
    }

    #[test]
    fn test_wizard_back_keeps_selections() {
        let groups = pizza_groups();
        let mut wizard = ModifierWizard::new(&groups).unwrap();

        wizard.toggle("pzo1").unwrap();
        wizard.advance().unwrap();
        wizard.toggle("pzo6").unwrap();
        wizard.back();

        assert_eq!(wizard.step(), 0);
        assert!(wizard.selections().is_selected("pzo1"));
        assert!(wizard.selections().is_selected("pzo6"));
    }

    #[test]
    fn test_wizard_and_batch_flow_agree() {
        let groups = pizza_groups();

        // Wizard flow
        let mut wizard = ModifierWizard::new(&groups).unwrap();
        wizard.toggle("pzo3").unwrap();
        wizard.advance().unwrap();
        wizard.toggle("pzo6").unwrap();
        let from_wizard = wizard.finish().unwrap();

        // Batch flow over the same picks
        let mut set = SelectionSet::new();
        set.toggle(&groups[0], "pzo3").unwrap();
        set.toggle(&groups[1], "pzo6").unwrap();
        modifier::validate_all(&groups, set.selections()).unwrap();

        assert_eq!(from_wizard, set.into_selections());
    }
}
