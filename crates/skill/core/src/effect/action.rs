//! Action payloads and their world mutations.

use crate::engine::EventContext;
use crate::world::{Debuff, DebuffKind, EntityId, PeriodicDamage, ResourceKind, Task, Vec2, World};

/// Closest a dash may end to its target.
const DASH_STOP_DISTANCE: f32 = 1.0;

/// Side effect applied to the current targets (or the caster).
///
/// Deserializing an unrecognized variant name yields [`ActionSpec::Custom`]
/// with that name as `kind`; its fields are skipped.
#[derive(Clone, Debug, PartialEq, strum::VariantNames)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(remote = "Self")
)]
pub enum ActionSpec {
    // ========================================================================
    // Damage
    // ========================================================================
    /// Direct hit on every target.
    Damage { amount: u32 },

    /// Hits every hostile within `radius` of each target (or of the caster
    /// when there are none). Each entity is hit at most once.
    AreaDamage { amount: u32, radius: f32 },

    /// Schedules `ticks` hits of `amount`, one every `interval_ms`.
    DamageOverTime {
        amount: u32,
        ticks: u32,
        interval_ms: u64,
    },

    // ========================================================================
    // Status
    // ========================================================================
    Debuff {
        kind: DebuffKind,
        magnitude: u32,
        duration_ms: u64,
    },

    /// Leaves mark stacks owned by the caster.
    Mark {
        stacks: u32,
        max_stacks: u32,
        duration_ms: u64,
    },

    /// Consumes the caster's marks on each target: bonus damage per stack,
    /// plus an optional resource refund per stack.
    MarkPayout {
        damage_per_stack: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        refund: Option<(ResourceKind, u32)>,
    },

    // ========================================================================
    // Movement
    // ========================================================================
    /// Moves the caster toward the first target, or along its facing.
    Dash { distance: f32 },

    /// Pushes every target away from the caster.
    Knockback { distance: f32 },

    // ========================================================================
    // Sustain
    // ========================================================================
    /// Restores the caster's hit points.
    Heal { amount: u32 },

    // ========================================================================
    // Extension
    // ========================================================================
    /// Action kind this engine does not know. Executes as a no-op so newer
    /// content still loads and runs.
    Custom { kind: String },
}

impl ActionSpec {
    /// Applies the action. Never fails; missing entities are skipped.
    pub fn execute(&self, ctx: &EventContext, world: &mut World) {
        let now = ctx.now;
        match self {
            Self::Damage { amount } => {
                for target in &ctx.targets {
                    let dealt = world.apply_damage(*target, *amount, now);
                    tracing::trace!(%target, dealt, "damage");
                }
            }

            Self::AreaDamage { amount, radius } => {
                let centers: Vec<Vec2> = if ctx.targets.is_empty() {
                    world.entity(ctx.caster).map(|c| c.position).into_iter().collect()
                } else {
                    ctx.targets
                        .iter()
                        .filter_map(|id| world.entity(*id).map(|e| e.position))
                        .collect()
                };
                let Some(caster) = world.entity(ctx.caster) else {
                    return;
                };
                let hit: Vec<EntityId> = world
                    .entities
                    .values()
                    .filter(|e| e.is_alive() && e.is_hostile_to(caster))
                    .filter(|e| centers.iter().any(|c| c.distance(e.position) <= *radius))
                    .map(|e| e.id)
                    .collect();
                for target in hit {
                    world.apply_damage(target, *amount, now);
                }
            }

            Self::DamageOverTime {
                amount,
                ticks,
                interval_ms,
            } => {
                if *ticks == 0 {
                    return;
                }
                let skill = ctx.template_id().unwrap_or_default().to_string();
                for target in &ctx.targets {
                    world.queue.push(
                        now.saturating_add(*interval_ms),
                        Task::PeriodicDamage(PeriodicDamage {
                            skill: skill.clone(),
                            source: ctx.caster,
                            target: *target,
                            amount: *amount,
                            remaining: *ticks,
                            interval_ms: *interval_ms,
                        }),
                    );
                }
            }

            Self::Debuff {
                kind,
                magnitude,
                duration_ms,
            } => {
                for target in &ctx.targets {
                    world.apply_debuff(
                        *target,
                        Debuff {
                            kind: *kind,
                            magnitude: *magnitude,
                            expires_at: now.saturating_add(*duration_ms),
                        },
                    );
                }
            }

            Self::Mark {
                stacks,
                max_stacks,
                duration_ms,
            } => {
                for target in &ctx.targets {
                    world.add_marks(
                        *target,
                        ctx.caster,
                        *stacks,
                        *max_stacks,
                        now.saturating_add(*duration_ms),
                        now,
                    );
                }
            }

            Self::MarkPayout {
                damage_per_stack,
                refund,
            } => {
                for target in &ctx.targets {
                    let stacks = world.take_marks(*target, ctx.caster, now);
                    if stacks == 0 {
                        continue;
                    }
                    world.apply_damage(*target, damage_per_stack.saturating_mul(stacks), now);
                    if let Some((resource, per_stack)) = refund {
                        let amount = per_stack.saturating_mul(stacks);
                        world.grant_resource(ctx.caster, *resource, amount);
                    }
                    tracing::trace!(%target, stacks, "mark payout");
                }
            }

            Self::Dash { distance } => {
                let goal = ctx
                    .targets
                    .iter()
                    .find(|id| **id != ctx.caster)
                    .and_then(|id| world.entity(*id))
                    .map(|e| e.position);
                let Some(caster) = world.entity_mut(ctx.caster) else {
                    return;
                };
                let (direction, step) = match goal.and_then(|g| {
                    caster.position.direction_to(g).map(|d| (d, caster.position.distance(g)))
                }) {
                    Some((dir, gap)) => (dir, distance.min((gap - DASH_STOP_DISTANCE).max(0.0))),
                    None => (Vec2::from_angle(caster.facing), *distance),
                };
                caster.position = caster.position.offset(direction, step);
                caster.facing = direction.y.atan2(direction.x);
            }

            Self::Knockback { distance } => {
                let Some((origin, facing)) =
                    world.entity(ctx.caster).map(|c| (c.position, c.facing))
                else {
                    return;
                };
                for target in &ctx.targets {
                    if *target == ctx.caster {
                        continue;
                    }
                    if let Some(entity) = world.entity_mut(*target) {
                        let dir = origin
                            .direction_to(entity.position)
                            .unwrap_or_else(|| Vec2::from_angle(facing));
                        entity.position = entity.position.offset(dir, *distance);
                    }
                }
            }

            Self::Heal { amount } => {
                world.heal(ctx.caster, *amount);
            }

            Self::Custom { kind } => {
                tracing::trace!(kind = kind.as_str(), "unknown action kind, skipped");
            }
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::de::value::EnumAccessDeserializer;
    use serde::de::{
        self, DeserializeSeed, EnumAccess, IgnoredAny, IntoDeserializer, MapAccess, SeqAccess,
        VariantAccess, Visitor,
    };
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use strum::VariantNames;

    use super::ActionSpec;

    impl Serialize for ActionSpec {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            ActionSpec::serialize(self, serializer)
        }
    }

    impl<'de> Deserialize<'de> for ActionSpec {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_enum("ActionSpec", ActionSpec::VARIANTS, ActionVisitor)
        }
    }

    /// Variant name read as an identifier, whatever it is.
    struct VariantName(String);

    impl<'de> Deserialize<'de> for VariantName {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct NameVisitor;

            impl Visitor<'_> for NameVisitor {
                type Value = VariantName;

                fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str("an action kind")
                }

                fn visit_str<E: de::Error>(self, name: &str) -> Result<VariantName, E> {
                    Ok(VariantName(name.to_string()))
                }
            }

            deserializer.deserialize_identifier(NameVisitor)
        }
    }

    struct ActionVisitor;

    impl<'de> Visitor<'de> for ActionVisitor {
        type Value = ActionSpec;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("an action")
        }

        fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<ActionSpec, A::Error> {
            let (VariantName(name), variant) = data.variant()?;
            if ActionSpec::VARIANTS.contains(&name.as_str()) {
                ActionSpec::deserialize(EnumAccessDeserializer::new(Replay { name, variant }))
            } else {
                variant.struct_variant(&[], SkipFields)?;
                Ok(ActionSpec::Custom { kind: name })
            }
        }
    }

    /// Hands an already-read variant name back to the derived deserializer.
    struct Replay<V> {
        name: String,
        variant: V,
    }

    impl<'de, V: VariantAccess<'de>> EnumAccess<'de> for Replay<V> {
        type Error = V::Error;
        type Variant = V;

        fn variant_seed<S: DeserializeSeed<'de>>(
            self,
            seed: S,
        ) -> Result<(S::Value, V), V::Error> {
            let value = seed.deserialize(self.name.into_deserializer())?;
            Ok((value, self.variant))
        }
    }

    struct SkipFields;

    impl<'de> Visitor<'de> for SkipFields {
        type Value = ();

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("action fields")
        }

        fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<(), M::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(())
        }

        fn visit_seq<S: SeqAccess<'de>>(self, mut seq: S) -> Result<(), S::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Entity, EntityKind, Team};

    fn arena() -> World {
        let mut world = World::new();
        world.spawn(
            Entity::new(EntityId::HERO, EntityKind::Hero, Team::Players, Vec2::ORIGIN, 100)
                .with_resource(ResourceKind::Energy, 0),
        );
        for (id, x) in [(1, 5.0), (2, 6.0), (3, -9.0)] {
            let position = Vec2::new(x, 0.0);
            let minion =
                Entity::new(EntityId(id), EntityKind::Minion, Team::Monsters, position, 60);
            world.spawn(minion);
        }
        world
    }

    fn ctx(targets: Vec<EntityId>) -> EventContext {
        EventContext::new(1_000, EntityId::HERO, 1).with_targets(targets)
    }

    fn hp(world: &World, id: u32) -> u32 {
        world.entity(EntityId(id)).unwrap().hp
    }

    #[test]
    fn area_damage_hits_each_once() {
        let mut world = arena();
        ActionSpec::AreaDamage {
            amount: 10,
            radius: 2.0,
        }
        .execute(&ctx(vec![EntityId(1), EntityId(2)]), &mut world);
        assert_eq!(hp(&world, 1), 50);
        assert_eq!(hp(&world, 2), 50);
        assert_eq!(hp(&world, 3), 60);
        assert_eq!(world.entity(EntityId::HERO).unwrap().hp, 100);
    }

    #[test]
    fn dot_schedules_ticks() {
        let mut world = arena();
        ActionSpec::DamageOverTime {
            amount: 3,
            ticks: 4,
            interval_ms: 250,
        }
        .execute(&ctx(vec![EntityId(1)]), &mut world);
        assert_eq!(world.queue.len(), 1);
        assert_eq!(world.queue.next_due_at(), Some(1_250));
        assert_eq!(hp(&world, 1), 60);
    }

    #[test]
    fn mark_then_payout_refunds() {
        let mut world = arena();
        let c = ctx(vec![EntityId(1)]);
        let mark = ActionSpec::Mark {
            stacks: 1,
            max_stacks: 5,
            duration_ms: 3_000,
        };
        mark.execute(&c, &mut world);
        mark.execute(&c, &mut world);

        ActionSpec::MarkPayout {
            damage_per_stack: 7,
            refund: Some((ResourceKind::Energy, 5)),
        }
        .execute(&c, &mut world);
        assert_eq!(hp(&world, 1), 46);
        assert_eq!(world.entity(EntityId::HERO).unwrap().resource(ResourceKind::Energy), 10);
        assert_eq!(world.entity(EntityId(1)).unwrap().marks, None);
    }

    #[test]
    fn dash_stops_short_of_target() {
        let mut world = arena();
        ActionSpec::Dash { distance: 10.0 }.execute(&ctx(vec![EntityId(1)]), &mut world);
        let hero = world.entity(EntityId::HERO).unwrap();
        assert!((hero.position.x - 4.0).abs() < 1e-4);
        assert!(hero.position.y.abs() < 1e-4);
    }

    #[test]
    fn knockback_pushes_away() {
        let mut world = arena();
        ActionSpec::Knockback { distance: 2.0 }.execute(&ctx(vec![EntityId(3)]), &mut world);
        let pushed = world.entity(EntityId(3)).unwrap();
        assert!((pushed.position.x + 11.0).abs() < 1e-4);
    }

    #[test]
    fn payout_saturates_instead_of_overflowing() {
        let mut world = arena();
        let c = ctx(vec![EntityId(1)]);
        ActionSpec::Mark {
            stacks: 3,
            max_stacks: 5,
            duration_ms: 3_000,
        }
        .execute(&c, &mut world);

        ActionSpec::MarkPayout {
            damage_per_stack: 2_000_000_000,
            refund: Some((ResourceKind::Energy, u32::MAX)),
        }
        .execute(&c, &mut world);
        assert_eq!(hp(&world, 1), 0);
        assert_eq!(
            world.entity(EntityId::HERO).unwrap().resource(ResourceKind::Energy),
            u32::MAX
        );
    }

    #[test]
    fn unknown_kind_is_noop() {
        let mut world = arena();
        let before = world.entities.clone();
        ActionSpec::Custom {
            kind: "chain_lightning".into(),
        }
        .execute(&ctx(vec![EntityId(1)]), &mut world);
        assert_eq!(world.entities, before);
    }
}
