//! The op interpreter: a single-threaded, left-to-right walk over an
//! assembly's ops.
//!
//! - Condition: false aborts the remaining walk (silently)
//! - Target: replaces `ctx.targets`
//! - Timeline: hands the rest of the walk to a [`Scheduler`] and returns
//! - Action: applied for effect
//!
//! A suspended walk is a plain [`Continuation`] value; it refers back to the
//! original compiled assembly through an `Arc` and is resumed by whatever
//! polls the world's task queue.

use std::sync::Arc;

use super::context::EventContext;
use super::guard::{GuardDecision, guards_pass};
use crate::compiler::{Assembly, OpBehavior};
use crate::effect::FailReason;
use crate::world::{Task, World};

// ============================================================================
// Continuation & Scheduling
// ============================================================================

/// Remainder of a suspended walk.
#[derive(Clone, Debug)]
pub struct Continuation {
    pub assembly: Arc<Assembly>,
    /// Index of the first op still to run.
    pub next_op: usize,
    /// Context to resume with; `ctx.now` is the resume time.
    pub ctx: EventContext,
}

impl Continuation {
    pub fn resume_at(&self) -> u64 {
        self.ctx.now
    }
}

/// Receives continuations produced by timeline ops.
pub trait Scheduler {
    fn schedule(&self, world: &mut World, continuation: Continuation);
}

/// Default scheduler: pushes onto the world's task queue at the resume time.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueueScheduler;

impl Scheduler for QueueScheduler {
    fn schedule(&self, world: &mut World, continuation: Continuation) {
        let at = continuation.resume_at();
        world.queue.push(at, Task::Resume(continuation));
    }
}

// ============================================================================
// Walk Results
// ============================================================================

/// How a walk ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Every op up to the end ran.
    Completed,
    /// A condition failed at op `at_op`; nothing after it ran.
    Fizzled { reason: FailReason, at_op: usize },
    /// A timeline op deferred ops from `next_op` onward to `resume_at`.
    Suspended { resume_at: u64, next_op: usize },
}

/// Counters for one walk segment (up to the end, a fizzle, or a suspension).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub conditions_passed: u32,
    pub targets_resolved: u32,
    pub actions_run: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkReport {
    pub outcome: WalkOutcome,
    pub stats: WalkStats,
}

/// Result of one triggered invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// The rate guard dropped the trigger.
    Throttled(GuardDecision),
    Ran(WalkReport),
}

impl InvocationOutcome {
    pub fn ran(&self) -> bool {
        matches!(self, Self::Ran(_))
    }
}

// ============================================================================
// Interpreter
// ============================================================================

/// Walks `assembly.ops` from `start`.
pub fn execute_ops(
    assembly: &Arc<Assembly>,
    start: usize,
    mut ctx: EventContext,
    world: &mut World,
    scheduler: &dyn Scheduler,
) -> WalkReport {
    let mut stats = WalkStats::default();

    for (index, op) in assembly.ops.iter().enumerate().skip(start) {
        match &op.behavior {
            OpBehavior::Condition { check, fail_reason } => {
                if !check.evaluate(&mut ctx, world) {
                    tracing::trace!(
                        template = %assembly.template_id,
                        slot = %op.slot_id,
                        reason = %fail_reason,
                        "condition failed, walk aborted"
                    );
                    return WalkReport {
                        outcome: WalkOutcome::Fizzled {
                            reason: *fail_reason,
                            at_op: index,
                        },
                        stats,
                    };
                }
                stats.conditions_passed += 1;
            }

            OpBehavior::Target(spec) => {
                ctx.targets = spec.select(ctx.caster, world, ctx.now);
                stats.targets_resolved += 1;
                tracing::trace!(slot = %op.slot_id, count = ctx.targets.len(), "targets resolved");
            }

            OpBehavior::Timeline { delay_ms } => {
                let next_op = index + 1;
                if next_op >= assembly.ops.len() {
                    // Trailing delay: nothing left to resume.
                    break;
                }
                let continuation = Continuation {
                    assembly: Arc::clone(assembly),
                    next_op,
                    ctx: ctx.advanced(*delay_ms),
                };
                let resume_at = continuation.resume_at();
                scheduler.schedule(world, continuation);
                return WalkReport {
                    outcome: WalkOutcome::Suspended { resume_at, next_op },
                    stats,
                };
            }

            OpBehavior::Action(spec) => {
                spec.execute(&ctx, world);
                stats.actions_run += 1;
            }
        }
    }

    WalkReport {
        outcome: WalkOutcome::Completed,
        stats,
    }
}

/// Runs one triggered invocation: guard check, then a walk from the first op.
pub fn execute_assembly(
    assembly: &Arc<Assembly>,
    mut ctx: EventContext,
    world: &mut World,
    scheduler: &dyn Scheduler,
) -> InvocationOutcome {
    if !assembly.guards.is_noop() {
        let state = world.runtime_state_mut(&assembly.template_id);
        let decision = guards_pass(&assembly.guards, state, ctx.now);
        if !decision.is_pass() {
            tracing::trace!(template = %assembly.template_id, ?decision, "trigger throttled");
            return InvocationOutcome::Throttled(decision);
        }
    }

    ctx.assembly = Some(Arc::clone(assembly));
    InvocationOutcome::Ran(execute_ops(assembly, 0, ctx, world, scheduler))
}
