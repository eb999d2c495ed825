//! Synchronous event bus keyed by trigger-event name.

use std::collections::HashMap;
use std::sync::Arc;

use super::context::EventContext;
use super::interpreter::{QueueScheduler, execute_assembly};
use crate::compiler::Assembly;
use crate::world::World;

/// Something that reacts to an emitted event.
pub trait EventHandler {
    fn handle(&self, ctx: &EventContext, world: &mut World);
}

impl<F> EventHandler for F
where
    F: Fn(&EventContext, &mut World),
{
    fn handle(&self, ctx: &EventContext, world: &mut World) {
        self(ctx, world)
    }
}

/// Runs one compiled assembly per event, scheduling through the world queue.
#[derive(Debug)]
pub struct AssemblyHandler {
    assembly: Arc<Assembly>,
}

impl AssemblyHandler {
    pub fn new(assembly: Arc<Assembly>) -> Self {
        Self { assembly }
    }

    pub fn assembly(&self) -> &Arc<Assembly> {
        &self.assembly
    }
}

impl EventHandler for AssemblyHandler {
    fn handle(&self, ctx: &EventContext, world: &mut World) {
        execute_assembly(&self.assembly, ctx.clone(), world, &QueueScheduler);
    }
}

/// Event name -> handlers in subscription order.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<String, Vec<Arc<dyn EventHandler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, event: impl Into<String>, handler: impl EventHandler + 'static) {
        self.handlers
            .entry(event.into())
            .or_default()
            .push(Arc::new(handler));
    }

    /// Invokes every handler subscribed to `event`, synchronously and in
    /// subscription order. Each handler receives its own copy of `ctx` with
    /// a forked random stream. Returns the number of handlers invoked.
    pub fn emit(&self, event: &str, ctx: &EventContext, world: &mut World) -> usize {
        let Some(handlers) = self.handlers.get(event) else {
            tracing::trace!(event, "no subscribers");
            return 0;
        };
        for (index, handler) in handlers.iter().enumerate() {
            let mut local = ctx.clone();
            local.rng = ctx.rng.fork(index as u64);
            handler.handle(&local, world);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(event, handlers)| (event.as_str(), handlers.len()))
            .collect();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

/// Subscribes one [`AssemblyHandler`] per assembly to its trigger event.
///
/// The world is supplied at [`EventBus::emit`] time rather than captured.
pub fn build_event_bus_with_assemblies<I>(assemblies: I) -> EventBus
where
    I: IntoIterator<Item = Arc<Assembly>>,
{
    let mut bus = EventBus::new();
    for assembly in assemblies {
        tracing::debug!(
            template = %assembly.template_id,
            event = %assembly.event,
            "subscribing assembly"
        );
        let event = assembly.event.clone();
        bus.subscribe(event, AssemblyHandler::new(assembly));
    }
    bus
}
