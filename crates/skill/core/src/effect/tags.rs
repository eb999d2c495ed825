//! Effect tags - the normalized vocabulary synergy and coupling rules match on.
//!
//! Tags are derived from option payloads; content may add explicit tags for
//! meaning a payload cannot express (e.g. a counterattack template).

use super::{ActionSpec, ConditionSpec, TargetSpec};
use crate::world::DebuffKind;

/// Normalized effect label.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffectTag {
    Damage,
    Aoe,
    Dot,
    Slow,
    Stun,
    Vulnerable,
    Mark,
    Payout,
    Mobility,
    Knockback,
    Sustain,
    Proc,
    Delay,
    Gate,
    Counter,
    Projectile,
}

/// Sorts and deduplicates a tag list.
pub fn normalize_tags(mut tags: Vec<EffectTag>) -> Vec<EffectTag> {
    tags.sort_unstable();
    tags.dedup();
    tags
}

impl ConditionSpec {
    pub fn effect_tags(&self) -> Vec<EffectTag> {
        match self {
            Self::ProcChance { .. } => vec![EffectTag::Proc],
            Self::HasResource { .. } | Self::InRange { .. } | Self::TargetType { .. } => {
                vec![EffectTag::Gate]
            }
        }
    }
}

impl TargetSpec {
    pub fn effect_tags(&self) -> Vec<EffectTag> {
        if self.is_multi_target() {
            vec![EffectTag::Aoe]
        } else {
            Vec::new()
        }
    }
}

impl ActionSpec {
    pub fn effect_tags(&self) -> Vec<EffectTag> {
        match self {
            Self::Damage { .. } => vec![EffectTag::Damage],
            Self::AreaDamage { .. } => vec![EffectTag::Damage, EffectTag::Aoe],
            Self::DamageOverTime { .. } => vec![EffectTag::Damage, EffectTag::Dot],
            Self::Debuff { kind, .. } => vec![match kind {
                DebuffKind::Slow => EffectTag::Slow,
                DebuffKind::Stun => EffectTag::Stun,
                DebuffKind::Vulnerable => EffectTag::Vulnerable,
            }],
            Self::Mark { .. } => vec![EffectTag::Mark],
            Self::MarkPayout { .. } => vec![EffectTag::Payout, EffectTag::Damage],
            Self::Dash { .. } => vec![EffectTag::Mobility],
            Self::Knockback { .. } => vec![EffectTag::Knockback],
            Self::Heal { .. } => vec![EffectTag::Sustain],
            Self::Custom { .. } => Vec::new(),
        }
    }
}
