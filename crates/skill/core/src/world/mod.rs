//! Live combat world consumed by the execution engine.
//!
//! The world is owned by the host game loop. Action ops mutate entities in
//! place, guard checks mutate [`RuntimeState`] records, and timeline ops push
//! continuations onto the [`TaskQueue`]. Entities that reach zero hit points
//! are appended to `pending_deaths` for an external death processor.

mod entity;
mod queue;

pub use entity::{
    Debuff, DebuffKind, Entity, EntityId, EntityKind, MarkStack, ResourceKind, Team, Vec2,
};
pub use queue::{PeriodicDamage, ScheduledTask, Task, TaskQueue};

use std::collections::{BTreeMap, HashMap};

use crate::engine::RuntimeState;

/// Mutable world state shared by every assembly invocation.
#[derive(Debug, Default)]
pub struct World {
    /// Entities by id; iteration order is id order.
    pub entities: BTreeMap<EntityId, Entity>,
    pub queue: TaskQueue,
    /// Guard state per template id, created on first guarded invocation.
    pub skill_runtime: HashMap<String, RuntimeState>,
    pub pending_deaths: Vec<EntityId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) an entity.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.insert(entity.id, entity);
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Guard state for a template, created lazily.
    pub fn runtime_state_mut(&mut self, template_id: &str) -> &mut RuntimeState {
        self.skill_runtime
            .entry(template_id.to_string())
            .or_default()
    }

    /// Deals damage, amplified by an active `Vulnerable` debuff.
    ///
    /// Returns the hit points actually removed. Dead or missing targets take
    /// nothing. A target brought to zero is queued in `pending_deaths` once.
    pub fn apply_damage(&mut self, target: EntityId, amount: u32, now: u64) -> u32 {
        let Some(entity) = self.entities.get_mut(&target) else {
            return 0;
        };
        if !entity.is_alive() {
            return 0;
        }

        let bonus = entity.debuff(DebuffKind::Vulnerable, now).unwrap_or(0);
        let planned = u64::from(amount).saturating_mul(100 + u64::from(bonus)) / 100;
        let actual = planned.min(u64::from(entity.hp)) as u32;
        entity.hp -= actual;

        if entity.hp == 0 && !self.pending_deaths.contains(&target) {
            self.pending_deaths.push(target);
        }
        actual
    }

    /// Restores hit points up to the maximum. Returns the amount restored.
    pub fn heal(&mut self, target: EntityId, amount: u32) -> u32 {
        let Some(entity) = self.entities.get_mut(&target) else {
            return 0;
        };
        if !entity.is_alive() {
            return 0;
        }
        let restored = amount.min(entity.max_hp.saturating_sub(entity.hp));
        entity.hp += restored;
        restored
    }

    /// Applies a debuff; an existing debuff of the same kind is refreshed
    /// to the stronger magnitude and later expiry.
    pub fn apply_debuff(&mut self, target: EntityId, debuff: Debuff) {
        let Some(entity) = self.entities.get_mut(&target) else {
            return;
        };
        match entity.debuffs.iter_mut().find(|d| d.kind == debuff.kind) {
            Some(existing) => {
                existing.magnitude = existing.magnitude.max(debuff.magnitude);
                existing.expires_at = existing.expires_at.max(debuff.expires_at);
            }
            None => entity.debuffs.push(debuff),
        }
    }

    /// Adds mark stacks (capped at `max_stacks`) and refreshes expiry.
    ///
    /// Expired marks, or marks from another source, are replaced.
    pub fn add_marks(
        &mut self,
        target: EntityId,
        source: EntityId,
        stacks: u32,
        max_stacks: u32,
        expires_at: u64,
        now: u64,
    ) {
        let Some(entity) = self.entities.get_mut(&target) else {
            return;
        };
        let current = match entity.marks {
            Some(mark) if mark.source == source && now < mark.expires_at => mark.stacks,
            _ => 0,
        };
        entity.marks = Some(MarkStack {
            source,
            stacks: current.saturating_add(stacks).min(max_stacks),
            expires_at,
        });
    }

    /// Removes and returns active mark stacks placed by `source`.
    pub fn take_marks(&mut self, target: EntityId, source: EntityId, now: u64) -> u32 {
        let Some(entity) = self.entities.get_mut(&target) else {
            return 0;
        };
        match entity.marks.take() {
            Some(mark) if mark.source == source && now < mark.expires_at => mark.stacks,
            Some(other) => {
                entity.marks = Some(other);
                0
            }
            None => 0,
        }
    }

    /// Adds to a resource pool.
    pub fn grant_resource(&mut self, target: EntityId, resource: ResourceKind, amount: u32) {
        if let Some(entity) = self.entities.get_mut(&target) {
            let pool = entity.resources.entry(resource).or_insert(0);
            *pool = pool.saturating_add(amount);
        }
    }
}
