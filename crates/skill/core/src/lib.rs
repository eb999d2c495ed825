//! Skill assembly core: templates, budget ledger, op compiler and execution engine.
//!
//! `skill-core` turns a declarative [`Template`] plus one chosen option per
//! slot into an immutable [`Assembly`], and runs assemblies against a live
//! [`World`] when their trigger event is emitted.
//!
//! - [`budget`] sums and caps per-category costs
//! - [`template`] defines slots, options and their payloads
//! - [`compiler`] builds ops in the caller's execution order
//! - [`engine`] hosts the event bus, rate guards and interpreter
//! - [`world`] holds entities, the task queue and guard state
pub mod budget;
pub mod compiler;
pub mod effect;
pub mod engine;
pub mod error;
pub mod template;
pub mod world;

pub use budget::{Budget, BudgetCategory};
pub use compiler::{Assembly, Op, OpBehavior, SlotSelections, compile, compile_defaults};
pub use effect::{ActionSpec, ConditionSpec, EffectTag, FailReason, TargetSpec};
pub use engine::{
    Continuation, EventBus, EventContext, GuardSpec, InvocationOutcome, QueueScheduler,
    Scheduler, WalkOutcome, WalkReport, build_event_bus_with_assemblies, execute_assembly,
    execute_ops, run_due_tasks,
};
pub use error::{CompileError, ErrorSeverity, SkillError, TemplateError};
pub use template::{OptionDef, OptionPayload, PresentationHints, Slot, SlotKind, Template};
pub use world::{
    Debuff, DebuffKind, Entity, EntityId, EntityKind, ResourceKind, Team, Vec2, World,
};
