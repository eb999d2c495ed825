//! Complexity tiers and biased template picking.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use skill_core::Template;

use crate::config::{GeneratorConfig, TierWeights};

/// Fixed-slot share above which a template counts as low diversity.
pub const LOW_DIVERSITY_RATIO: f32 = 0.5;

/// Slot-count band a template falls in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    /// Up to three slots.
    Simple,
    /// Four or five slots.
    Normal,
    /// Six or more slots.
    Complex,
}

impl Tier {
    pub fn of(template: &Template) -> Self {
        match template.slots.len() {
            0..=3 => Self::Simple,
            4..=5 => Self::Normal,
            _ => Self::Complex,
        }
    }

    pub fn weight(self, weights: &TierWeights) -> u32 {
        match self {
            Self::Simple => weights.simple,
            Self::Normal => weights.normal,
            Self::Complex => weights.complex,
        }
    }
}

/// Mostly single-option slots: little behavioral variety to search.
pub fn is_low_diversity(template: &Template) -> bool {
    template.fixed_slot_ratio() > LOW_DIVERSITY_RATIO
}

/// Rolls a tier among those that have templates, then a template inside it.
///
/// Inside a tier, the previous pick and low-diversity templates are
/// down-weighted but never excluded, so a tier with a single template still
/// yields it. Returns `None` only for an empty slice.
pub fn pick_template<'a, R: Rng + ?Sized>(
    rng: &mut R,
    templates: &'a [Template],
    config: &GeneratorConfig,
    last: Option<&str>,
) -> Option<&'a Template> {
    let tier = pick_tier(rng, templates, &config.tier_weights)?;
    let pool: Vec<&Template> = templates.iter().filter(|t| Tier::of(t) == tier).collect();

    let weight = |template: &&Template| {
        let mut w = 1.0_f32;
        if last == Some(template.id.as_str()) {
            w *= config.repeat_penalty;
        }
        if is_low_diversity(template) {
            w *= config.low_diversity_penalty;
        }
        w.max(0.0)
    };

    match pool.choose_weighted(rng, weight) {
        Ok(template) => Some(*template),
        // Every weight was zero: fall back to a plain uniform draw.
        Err(_) => pool.choose(rng).copied(),
    }
}

fn pick_tier<R: Rng + ?Sized>(
    rng: &mut R,
    templates: &[Template],
    weights: &TierWeights,
) -> Option<Tier> {
    let mut present: Vec<Tier> = Vec::with_capacity(3);
    for template in templates {
        let tier = Tier::of(template);
        if !present.contains(&tier) {
            present.push(tier);
        }
    }
    // Stable roll order regardless of catalog order.
    present.sort();

    match present.choose_weighted(rng, |tier| tier.weight(weights)) {
        Ok(tier) => Some(*tier),
        Err(_) => present.choose(rng).copied(),
    }
}
