//! Condition payloads and their predicates.

use crate::engine::EventContext;
use crate::world::{EntityKind, ResourceKind, World};

/// Predicate evaluated against the caster, the current targets and the world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionSpec {
    /// Caster holds at least `min` of a resource.
    HasResource { resource: ResourceKind, min: u32 },

    /// Every current target is within `max_range` of the caster.
    InRange { max_range: f32 },

    /// Every current target's kind is whitelisted.
    TargetType { allowed: Vec<EntityKind> },

    /// Passes with `percent` chance (0-100). Always consumes one roll.
    ProcChance { percent: u32 },
}

/// Why a condition stopped a walk. Logged, never raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum FailReason {
    NotEnoughResource,
    OutOfRange,
    WrongTargetType,
    ProcMissed,
}

impl ConditionSpec {
    /// Reason tag reported when this condition fails.
    pub fn fail_reason(&self) -> FailReason {
        match self {
            Self::HasResource { .. } => FailReason::NotEnoughResource,
            Self::InRange { .. } => FailReason::OutOfRange,
            Self::TargetType { .. } => FailReason::WrongTargetType,
            Self::ProcChance { .. } => FailReason::ProcMissed,
        }
    }

    /// Evaluates the predicate. Target checks are vacuously true for an
    /// empty target list; a target missing from the world fails them.
    pub fn evaluate(&self, ctx: &mut EventContext, world: &World) -> bool {
        match self {
            Self::HasResource { resource, min } => world
                .entity(ctx.caster)
                .is_some_and(|caster| caster.resource(*resource) >= *min),

            Self::InRange { max_range } => {
                let Some(caster) = world.entity(ctx.caster) else {
                    return false;
                };
                ctx.targets.iter().all(|id| {
                    world
                        .entity(*id)
                        .is_some_and(|t| caster.position.distance(t.position) <= *max_range)
                })
            }

            Self::TargetType { allowed } => ctx.targets.iter().all(|id| {
                world
                    .entity(*id)
                    .is_some_and(|t| allowed.contains(&t.kind))
            }),

            Self::ProcChance { percent } => ctx.rng.roll_d100() <= *percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EventContext;
    use crate::world::{Entity, EntityId, Team, Vec2};

    fn arena() -> World {
        let mut world = World::new();
        world.spawn(
            Entity::new(EntityId::HERO, EntityKind::Hero, Team::Players, Vec2::ORIGIN, 100)
                .with_resource(ResourceKind::Mana, 30),
        );
        world.spawn(Entity::new(
            EntityId(1),
            EntityKind::Minion,
            Team::Monsters,
            Vec2::new(3.0, 4.0),
            40,
        ));
        world.spawn(Entity::new(
            EntityId(2),
            EntityKind::Boss,
            Team::Monsters,
            Vec2::new(10.0, 0.0),
            400,
        ));
        world
    }

    fn ctx(targets: Vec<EntityId>) -> EventContext {
        EventContext::new(0, EntityId::HERO, 7).with_targets(targets)
    }

    #[test]
    fn resource_threshold() {
        let world = arena();
        let mut c = ctx(vec![]);
        let enough = ConditionSpec::HasResource {
            resource: ResourceKind::Mana,
            min: 30,
        };
        let too_much = ConditionSpec::HasResource {
            resource: ResourceKind::Mana,
            min: 31,
        };
        let other = ConditionSpec::HasResource {
            resource: ResourceKind::Rage,
            min: 1,
        };
        assert!(enough.evaluate(&mut c, &world));
        assert!(!too_much.evaluate(&mut c, &world));
        assert!(!other.evaluate(&mut c, &world));
    }

    #[test]
    fn range_checks_every_target() {
        let world = arena();
        let cond = ConditionSpec::InRange { max_range: 5.0 };
        assert!(cond.evaluate(&mut ctx(vec![EntityId(1)]), &world));
        assert!(!cond.evaluate(&mut ctx(vec![EntityId(1), EntityId(2)]), &world));
        assert!(cond.evaluate(&mut ctx(vec![]), &world));
    }

    #[test]
    fn type_whitelist() {
        let world = arena();
        let cond = ConditionSpec::TargetType {
            allowed: vec![EntityKind::Elite, EntityKind::Boss],
        };
        assert!(cond.evaluate(&mut ctx(vec![EntityId(2)]), &world));
        assert!(!cond.evaluate(&mut ctx(vec![EntityId(1), EntityId(2)]), &world));
        assert!(!cond.evaluate(&mut ctx(vec![EntityId(99)]), &world));
    }

    #[test]
    fn proc_chance_bounds() {
        let world = arena();
        let always = ConditionSpec::ProcChance { percent: 100 };
        let never = ConditionSpec::ProcChance { percent: 0 };
        let mut c = ctx(vec![]);
        for _ in 0..50 {
            assert!(always.evaluate(&mut c, &world));
            assert!(!never.evaluate(&mut c, &world));
        }
    }
}
