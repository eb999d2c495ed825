//! Per-invocation event context.

use std::sync::Arc;

use super::rng::ProcRng;
use crate::compiler::Assembly;
use crate::world::EntityId;

/// Ephemeral record handed to every op of one walk.
///
/// Target ops overwrite `targets`; timeline ops produce a copy with `now`
/// advanced by their delay.
#[derive(Clone, Debug)]
pub struct EventContext {
    /// Virtual time in milliseconds.
    pub now: u64,
    pub caster: EntityId,
    pub targets: Vec<EntityId>,
    pub rng: ProcRng,
    /// Assembly currently being run; set by the engine.
    pub assembly: Option<Arc<Assembly>>,
}

impl EventContext {
    pub fn new(now: u64, caster: EntityId, seed: u64) -> Self {
        Self {
            now,
            caster,
            targets: Vec::new(),
            rng: ProcRng::new(seed),
            assembly: None,
        }
    }

    /// Builder: preset targets (e.g. the entity that was hit).
    #[must_use]
    pub fn with_targets(mut self, targets: Vec<EntityId>) -> Self {
        self.targets = targets;
        self
    }

    /// Copy of this context with time advanced by `delay_ms`.
    #[must_use]
    pub fn advanced(&self, delay_ms: u64) -> Self {
        Self {
            now: self.now.saturating_add(delay_ms),
            ..self.clone()
        }
    }

    /// Template id of the running assembly, if any.
    pub fn template_id(&self) -> Option<&str> {
        self.assembly.as_deref().map(|a| a.template_id.as_str())
    }
}
