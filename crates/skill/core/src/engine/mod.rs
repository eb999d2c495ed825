//! Execution engine - event bus, rate guards and the op interpreter.
//!
//! Everything here is single-threaded and cooperative. The only suspension
//! point is a timeline op, which turns the rest of the walk into a
//! [`Continuation`] stored in the world's task queue. Nothing in this module
//! returns an error: failed conditions and throttled triggers are reported
//! as outcomes.

mod bus;
mod context;
mod guard;
mod interpreter;
mod rng;
mod tasks;

pub use bus::{AssemblyHandler, EventBus, EventHandler, build_event_bus_with_assemblies};
pub use context::EventContext;
pub use guard::{GuardDecision, GuardSpec, RuntimeState, guards_pass};
pub use interpreter::{
    Continuation, InvocationOutcome, QueueScheduler, Scheduler, WalkOutcome, WalkReport,
    WalkStats, execute_assembly, execute_ops,
};
pub use rng::ProcRng;
pub use tasks::run_due_tasks;
