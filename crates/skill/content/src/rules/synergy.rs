//! Synergy rules: tag combinations rewarded with extra budget allowance.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use skill_core::{Budget, EffectTag, budget};

/// Two or more effect tags whose simultaneous presence earns `bonus`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SynergyRule {
    pub name: String,
    pub tags: Vec<EffectTag>,
    pub bonus: Budget,
    #[serde(default)]
    pub description: String,
}

impl SynergyRule {
    pub fn is_satisfied_by(&self, present: &BTreeSet<EffectTag>) -> bool {
        self.tags.iter().all(|tag| present.contains(tag))
    }

    /// Number of rule tags not yet present.
    pub fn missing(&self, present: &BTreeSet<EffectTag>) -> usize {
        self.tags.iter().filter(|tag| !present.contains(tag)).count()
    }
}

/// Effect of adding a candidate's tags to an in-progress pick set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SynergyGain {
    None,
    /// Moves at least one rule closer to completion.
    Partial,
    /// Completes at least one rule that was not yet satisfied.
    Complete,
}

/// Declared synergies, evaluated in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SynergyTable {
    rules: Vec<SynergyRule>,
}

impl SynergyTable {
    pub fn new(rules: Vec<SynergyRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SynergyRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules fully satisfied by `present`.
    pub fn matches<'a>(&'a self, present: &BTreeSet<EffectTag>) -> Vec<&'a SynergyRule> {
        self.rules
            .iter()
            .filter(|rule| rule.is_satisfied_by(present))
            .collect()
    }

    /// Sum of the bonuses of every satisfied rule.
    pub fn bonus_for(&self, present: &BTreeSet<EffectTag>) -> Budget {
        self.matches(present)
            .into_iter()
            .fold(budget::zero(), |acc, rule| budget::add(&acc, &rule.bonus))
    }

    /// Classifies what picking an option tagged `candidate` would do to the
    /// rules given the tags already `present`.
    pub fn gain(&self, present: &BTreeSet<EffectTag>, candidate: &[EffectTag]) -> SynergyGain {
        let mut best = SynergyGain::None;
        for rule in &self.rules {
            if rule.is_satisfied_by(present) {
                continue;
            }
            let contributes = candidate.iter().any(|tag| rule.tags.contains(tag));
            if !contributes {
                continue;
            }
            let mut after = present.clone();
            after.extend(candidate.iter().copied());
            if rule.is_satisfied_by(&after) {
                return SynergyGain::Complete;
            }
            if rule.missing(&after) < rule.missing(present) {
                best = SynergyGain::Partial;
            }
        }
        best
    }
}
