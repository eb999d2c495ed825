//! Coupling rules: advisory companion tags for a chosen effect.
//!
//! Couplings never gate anything. Callers read them to bias later choices
//! or to explain a generated skill.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use skill_core::EffectTag;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    pub tag: EffectTag,
    /// Higher goes first.
    pub priority: u8,
    /// Probability weight in `0.0..=1.0`.
    pub weight: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CouplingRule {
    pub trigger: EffectTag,
    pub companions: Vec<Companion>,
}

/// One recommendation produced for a set of chosen tags.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Suggestion {
    pub trigger: EffectTag,
    pub tag: EffectTag,
    pub priority: u8,
    pub weight: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CouplingTable {
    rules: BTreeMap<EffectTag, Vec<Companion>>,
}

impl CouplingTable {
    /// Rules sharing a trigger are merged.
    pub fn new(rules: Vec<CouplingRule>) -> Self {
        let mut merged: BTreeMap<EffectTag, Vec<Companion>> = BTreeMap::new();
        for rule in rules {
            merged.entry(rule.trigger).or_default().extend(rule.companions);
        }
        Self { rules: merged }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn companions(&self, trigger: EffectTag) -> &[Companion] {
        self.rules.get(&trigger).map_or(&[], Vec::as_slice)
    }

    /// Companions recommended by `chosen` that are not already present,
    /// one per companion tag (best priority, then weight), highest first.
    pub fn suggest(&self, chosen: &BTreeSet<EffectTag>) -> Vec<Suggestion> {
        let mut best: BTreeMap<EffectTag, Suggestion> = BTreeMap::new();
        for trigger in chosen {
            for companion in self.companions(*trigger) {
                if chosen.contains(&companion.tag) {
                    continue;
                }
                let candidate = Suggestion {
                    trigger: *trigger,
                    tag: companion.tag,
                    priority: companion.priority,
                    weight: companion.weight,
                };
                let stronger = best.get(&companion.tag).is_none_or(|current| {
                    (current.priority, current.weight) < (candidate.priority, candidate.weight)
                });
                if stronger {
                    best.insert(companion.tag, candidate);
                }
            }
        }
        let mut suggestions: Vec<Suggestion> = best.into_values().collect();
        suggestions.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(b.weight.total_cmp(&a.weight))
                .then(a.tag.cmp(&b.tag))
        });
        suggestions
    }

    /// Weight multiplier (>= 1.0) for a candidate carrying `candidate` tags,
    /// given what is already `chosen`. Uses the strongest matching companion.
    pub fn bias(&self, chosen: &BTreeSet<EffectTag>, candidate: &[EffectTag]) -> f32 {
        let strongest = chosen
            .iter()
            .flat_map(|trigger| self.companions(*trigger))
            .filter(|c| candidate.contains(&c.tag) && !chosen.contains(&c.tag))
            .map(|c| c.weight.clamp(0.0, 1.0))
            .fold(0.0_f32, f32::max);
        1.0 + strongest
    }
}
