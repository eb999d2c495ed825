//! Option payloads - the building blocks a template slot can be filled with.
//!
//! Each slot kind has its own sum type:
//! - [`ConditionSpec`]: predicate that gates the rest of the walk
//! - [`TargetSpec`]: selector that replaces the current target list
//! - timeline: a plain delay in milliseconds
//! - [`ActionSpec`]: side effect applied to the world
//!
//! Payloads are data. The compiler wraps them into ops and the engine
//! dispatches on them with exhaustive matches, so a new variant is a
//! compile-time checklist rather than a silently ignored default branch.

mod action;
mod condition;
mod tags;
mod target;

pub use action::ActionSpec;
pub use condition::{ConditionSpec, FailReason};
pub use tags::{EffectTag, normalize_tags};
pub use target::TargetSpec;
