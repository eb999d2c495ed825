//! Budget ledger - multi-category power accounting for compiled skills.
//!
//! Every option may carry a [`Budget`] delta. The compiler folds those deltas
//! onto the template's baseline and checks the total against the template's
//! per-category caps. All functions here are pure.
//!
//! Categories are a closed set ([`BudgetCategory`]); a category absent from a
//! budget counts as zero, and a category absent from a cap means the category
//! may not be spent at all.

use std::collections::BTreeMap;

use crate::error::CompileError;

// ============================================================================
// Budget Category
// ============================================================================

/// Named resource dimension a skill spends from.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BudgetCategory {
    /// Raw damage output.
    Damage,
    /// Stuns, slows and other control.
    CrowdControl,
    /// Dashes and displacement.
    Mobility,
    /// Chance-based triggers.
    Proc,
    /// Runtime cost (target scans, queued ticks).
    Perf,
}

// ============================================================================
// Budget
// ============================================================================

/// Per-category non-negative cost totals.
///
/// Missing categories read as zero. Serialized as a plain map, e.g.
/// `{Damage: 3, Perf: 1}` in RON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Budget(BTreeMap<BudgetCategory, u32>);

impl Budget {
    /// All categories zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Builder: set one category.
    #[must_use]
    pub fn with(mut self, category: BudgetCategory, value: u32) -> Self {
        self.set(category, value);
        self
    }

    /// Reads a category, treating absence as zero.
    pub fn get(&self, category: BudgetCategory) -> u32 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn set(&mut self, category: BudgetCategory, value: u32) {
        self.0.insert(category, value);
    }

    /// Iterates the explicitly present categories in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (BudgetCategory, u32)> + '_ {
        self.0.iter().map(|(category, value)| (*category, *value))
    }

    /// Returns true when every category reads as zero.
    pub fn is_zero(&self) -> bool {
        self.0.values().all(|value| *value == 0)
    }

    /// Sum of every category; used for ranking, never for cap checks.
    pub fn total(&self) -> u32 {
        self.0.values().fold(0u32, |acc, value| acc.saturating_add(*value))
    }
}

impl FromIterator<(BudgetCategory, u32)> for Budget {
    fn from_iter<I: IntoIterator<Item = (BudgetCategory, u32)>>(iter: I) -> Self {
        let mut budget = Budget::zero();
        for (category, value) in iter {
            budget.set(category, budget.get(category).saturating_add(value));
        }
        budget
    }
}

// ============================================================================
// Ledger Operations
// ============================================================================

/// Returns an all-zero budget.
pub fn zero() -> Budget {
    Budget::zero()
}

/// Per-category sum of two budgets. Categories missing on either side count as zero.
pub fn add(a: &Budget, b: &Budget) -> Budget {
    let mut out = a.clone();
    for (category, value) in b.iter() {
        out.set(category, out.get(category).saturating_add(value));
    }
    out
}

/// Folds every delta onto `base`. `None` deltas contribute nothing.
///
/// An empty iterator returns `base` unchanged.
pub fn sum<'a, I>(deltas: I, base: &Budget) -> Budget
where
    I: IntoIterator<Item = Option<&'a Budget>>,
{
    deltas
        .into_iter()
        .flatten()
        .fold(base.clone(), |acc, delta| add(&acc, delta))
}

/// Fails on the first category whose total exceeds its cap.
///
/// A category missing from `cap` has a cap of zero, so any positive spend in
/// it is a violation.
pub fn assert_within_caps(total: &Budget, cap: &Budget) -> Result<(), CompileError> {
    for (category, value) in total.iter() {
        let limit = cap.get(category);
        if value > limit {
            return Err(CompileError::BudgetExceeded {
                category,
                total: value,
                cap: limit,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_treats_missing_categories_as_zero() {
        let a = Budget::zero().with(BudgetCategory::Damage, 2);
        let b = Budget::zero()
            .with(BudgetCategory::Damage, 3)
            .with(BudgetCategory::Mobility, 1);

        let total = add(&a, &b);
        assert_eq!(total.get(BudgetCategory::Damage), 5);
        assert_eq!(total.get(BudgetCategory::Mobility), 1);
        assert_eq!(total.get(BudgetCategory::Proc), 0);
    }

    #[test]
    fn sum_of_nothing_is_base() {
        let base = Budget::zero().with(BudgetCategory::Perf, 1);
        let total = sum(std::iter::empty(), &base);
        assert_eq!(total, base);
    }

    #[test]
    fn sum_skips_absent_deltas() {
        let base = Budget::zero().with(BudgetCategory::Perf, 1);
        let dmg = Budget::zero().with(BudgetCategory::Damage, 4);
        let cc = Budget::zero().with(BudgetCategory::CrowdControl, 2);

        let total = sum([Some(&dmg), None, Some(&cc), Some(&dmg)], &base);
        assert_eq!(total.get(BudgetCategory::Damage), 8);
        assert_eq!(total.get(BudgetCategory::CrowdControl), 2);
        assert_eq!(total.get(BudgetCategory::Perf), 1);
    }

    #[test]
    fn caps_reject_first_violation() {
        let total = Budget::zero()
            .with(BudgetCategory::Damage, 5)
            .with(BudgetCategory::Mobility, 9);
        let cap = Budget::zero()
            .with(BudgetCategory::Damage, 4)
            .with(BudgetCategory::Mobility, 1);

        let err = assert_within_caps(&total, &cap).unwrap_err();
        assert_eq!(
            err,
            CompileError::BudgetExceeded {
                category: BudgetCategory::Damage,
                total: 5,
                cap: 4,
            }
        );
    }

    #[test]
    fn uncapped_category_must_be_free() {
        let cap = Budget::zero().with(BudgetCategory::Damage, 10);

        let free = Budget::zero().with(BudgetCategory::Proc, 0);
        assert!(assert_within_caps(&free, &cap).is_ok());

        let spent = Budget::zero().with(BudgetCategory::Proc, 1);
        assert!(matches!(
            assert_within_caps(&spent, &cap),
            Err(CompileError::BudgetExceeded {
                category: BudgetCategory::Proc,
                total: 1,
                cap: 0,
            })
        ));
    }

    #[test]
    fn at_cap_is_allowed() {
        let total = Budget::zero().with(BudgetCategory::Damage, 4);
        let cap = total.clone();
        assert!(assert_within_caps(&total, &cap).is_ok());
    }

    #[test]
    fn category_names_parse() {
        use std::str::FromStr;
        assert_eq!(
            BudgetCategory::from_str("crowd_control").unwrap(),
            BudgetCategory::CrowdControl
        );
        assert_eq!(BudgetCategory::Perf.to_string(), "perf");
    }
}
