//! Generator tuning.

use serde::{Deserialize, Serialize};

/// Relative roll weights for the three complexity tiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierWeights {
    pub simple: u32,
    pub normal: u32,
    pub complex: u32,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            simple: 70,
            normal: 25,
            complex: 5,
        }
    }
}

/// Knobs for [`crate::Generator`]. Every field has a default, so a partial
/// `forge.toml` is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Biased attempts before the best-effort fallback pass.
    pub max_attempts: u32,
    /// Recent outputs remembered for duplicate rejection.
    pub history_capacity: usize,
    /// How far back a low-entropy template is checked for duplicates.
    pub low_entropy_window: usize,
    /// Share of identical picks (same template and order) that counts as a
    /// near duplicate.
    pub near_duplicate_ratio: f32,
    pub tier_weights: TierWeights,
    /// Weight multiplier for the template picked last time.
    pub repeat_penalty: f32,
    /// Weight multiplier for templates whose slots are mostly single-option.
    pub low_diversity_penalty: f32,
    /// Weight multiplier for an option that completes a synergy.
    pub synergy_complete_boost: f32,
    /// Weight multiplier for an option that moves a synergy closer.
    pub synergy_partial_boost: f32,
    /// Whether coupling recommendations bias later option picks.
    pub coupling_bias: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 40,
            history_capacity: 24,
            low_entropy_window: 4,
            near_duplicate_ratio: 0.8,
            tier_weights: TierWeights::default(),
            repeat_penalty: 0.15,
            low_diversity_penalty: 0.25,
            synergy_complete_boost: 2.5,
            synergy_partial_boost: 1.3,
            coupling_bias: true,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}
