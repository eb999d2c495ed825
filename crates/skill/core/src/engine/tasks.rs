//! Draining the world's task queue.

use super::interpreter::{Scheduler, execute_ops};
use crate::world::{PeriodicDamage, Task, World};

/// Runs every task due at or before `now`, earliest first, ties in
/// insertion order. Tasks scheduled while draining run in the same call if
/// they are already due. Returns the number of tasks run.
pub fn run_due_tasks(world: &mut World, now: u64, scheduler: &dyn Scheduler) -> usize {
    let mut ran = 0;
    while let Some(due) = world.queue.pop_due(now) {
        ran += 1;
        match due.task {
            Task::Resume(continuation) => {
                tracing::trace!(
                    template = %continuation.assembly.template_id,
                    next_op = continuation.next_op,
                    at = due.at,
                    "resuming walk"
                );
                execute_ops(
                    &continuation.assembly,
                    continuation.next_op,
                    continuation.ctx,
                    world,
                    scheduler,
                );
            }
            Task::PeriodicDamage(tick) => apply_tick(world, due.at, tick),
        }
    }
    ran
}

fn apply_tick(world: &mut World, at: u64, tick: PeriodicDamage) {
    let dealt = world.apply_damage(tick.target, tick.amount, at);
    tracing::trace!(
        skill = %tick.skill,
        source = %tick.source,
        target = %tick.target,
        dealt,
        remaining = tick.remaining,
        "periodic damage tick"
    );
    let alive = world.entity(tick.target).is_some_and(|e| e.is_alive());
    if tick.remaining > 1 && alive {
        let next_at = at.saturating_add(tick.interval_ms);
        world.queue.push(
            next_at,
            Task::PeriodicDamage(PeriodicDamage {
                remaining: tick.remaining - 1,
                ..tick
            }),
        );
    }
}
