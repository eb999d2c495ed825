//! Target selectors.
//!
//! Selectors filter living hostile entities around the caster, sort them by
//! distance (entity id breaks ties, so selection is deterministic) and cap the
//! result. Selection never fails; an empty list is a valid result.

use crate::world::{Entity, EntityId, World};

/// How a target op picks its targets.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetSpec {
    /// The caster itself.
    SelfOnly,

    /// Closest hostile within `range`.
    Nearest { range: f32 },

    /// Hostiles within `range` and within `half_angle_deg` of the caster's facing.
    Cone {
        range: f32,
        half_angle_deg: f32,
        max_targets: usize,
    },

    /// Hostiles within `radius` of the caster.
    Radius { radius: f32, max_targets: usize },

    /// Hostile within `range` with the lowest health ratio.
    LowestHealth { range: f32 },

    /// Hostiles within `range` carrying the caster's marks.
    Marked { range: f32, max_targets: usize },
}

impl TargetSpec {
    /// Resolves the target list for `caster` at time `now`.
    pub fn select(&self, caster: EntityId, world: &World, now: u64) -> Vec<EntityId> {
        let Some(origin) = world.entity(caster) else {
            return Vec::new();
        };

        match self {
            Self::SelfOnly => vec![caster],

            Self::Nearest { range } => nearby(origin, world, *range)
                .into_iter()
                .take(1)
                .map(|e| e.id)
                .collect(),

            Self::Cone {
                range,
                half_angle_deg,
                max_targets,
            } => {
                let facing = crate::world::Vec2::from_angle(origin.facing);
                let min_cos = half_angle_deg.to_radians().cos();
                nearby(origin, world, *range)
                    .into_iter()
                    .filter(|e| match origin.position.direction_to(e.position) {
                        Some(dir) => facing.dot(dir) >= min_cos,
                        // Standing on the caster counts as inside the cone.
                        None => true,
                    })
                    .take(*max_targets)
                    .map(|e| e.id)
                    .collect()
            }

            Self::Radius {
                radius,
                max_targets,
            } => nearby(origin, world, *radius)
                .into_iter()
                .take(*max_targets)
                .map(|e| e.id)
                .collect(),

            Self::LowestHealth { range } => {
                let mut candidates = nearby(origin, world, *range);
                // Stable sort keeps distance order among equal ratios.
                candidates.sort_by_key(|e| e.hp_permille());
                candidates.into_iter().take(1).map(|e| e.id).collect()
            }

            Self::Marked { range, max_targets } => nearby(origin, world, *range)
                .into_iter()
                .filter(|e| {
                    e.mark_stacks(now) > 0 && e.marks.is_some_and(|m| m.source == caster)
                })
                .take(*max_targets)
                .map(|e| e.id)
                .collect(),
        }
    }

    /// Returns true if the selector can yield more than one target.
    pub fn is_multi_target(&self) -> bool {
        match self {
            Self::Cone { max_targets, .. }
            | Self::Radius { max_targets, .. }
            | Self::Marked { max_targets, .. } => *max_targets > 1,
            Self::SelfOnly | Self::Nearest { .. } | Self::LowestHealth { .. } => false,
        }
    }
}

/// Living hostiles within `range`, nearest first.
fn nearby<'w>(origin: &Entity, world: &'w World, range: f32) -> Vec<&'w Entity> {
    let mut found: Vec<(&Entity, f32)> = world
        .entities
        .values()
        .filter(|e| e.is_alive() && e.is_hostile_to(origin))
        .map(|e| (e, origin.position.distance(e.position)))
        .filter(|(_, distance)| *distance <= range)
        .collect();
    found.sort_by(|(a, da), (b, db)| da.total_cmp(db).then(a.id.cmp(&b.id)));
    found.into_iter().map(|(e, _)| e).collect()
}
