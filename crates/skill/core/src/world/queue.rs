//! Time-ordered task queue owned by the world.
//!
//! Suspended op walks and periodic damage ticks are stored here as plain
//! values. Nothing in this crate runs a timer; the host loop polls
//! [`TaskQueue::pop_due`] (or [`crate::engine::run_due_tasks`]) each tick.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::engine::Continuation;
use crate::world::EntityId;

/// Work waiting for its due time.
#[derive(Clone, Debug)]
pub enum Task {
    /// Resume an op walk after a timeline delay.
    Resume(Continuation),

    /// One tick of a damage-over-time effect.
    PeriodicDamage(PeriodicDamage),
}

/// Remaining ticks of a damage-over-time effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodicDamage {
    pub skill: String,
    pub source: EntityId,
    pub target: EntityId,
    pub amount: u32,
    /// Ticks still to apply, including this one.
    pub remaining: u32,
    pub interval_ms: u64,
}

/// A task with its due time and insertion sequence.
#[derive(Clone, Debug)]
pub struct ScheduledTask {
    pub at: u64,
    pub seq: u64,
    pub task: Task,
}

impl ScheduledTask {
    fn key(&self) -> (u64, u64) {
        (self.at, self.seq)
    }
}

impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Min-ordered by `(at, seq)`: earliest first, ties in insertion order.
#[derive(Debug, Default)]
pub struct TaskQueue {
    heap: BinaryHeap<Reverse<ScheduledTask>>,
    next_seq: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `task` to run at virtual time `at`.
    pub fn push(&mut self, at: u64, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(ScheduledTask { at, seq, task }));
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<ScheduledTask> {
        if self.next_due_at()? > now {
            return None;
        }
        self.heap.pop().map(|Reverse(task)| task)
    }

    /// Due time of the earliest pending task.
    pub fn next_due_at(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(task)| task.at)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every pending task. This is the only way to cancel a continuation.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
