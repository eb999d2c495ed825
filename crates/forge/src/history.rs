//! Bounded FIFO memory of recent generator outputs.

use std::collections::VecDeque;

use skill_core::SlotSelections;

/// What makes two generated skills "the same": template, execution order and
/// the option picked for every slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fingerprint {
    pub template_id: String,
    pub order: Vec<String>,
    pub picks: SlotSelections,
}

impl Fingerprint {
    pub fn new(template_id: &str, order: &[String], picks: &SlotSelections) -> Self {
        Self {
            template_id: template_id.to_string(),
            order: order.to_vec(),
            picks: picks.clone(),
        }
    }

    /// Share (0.0-1.0) of slots that picked the same option, or 0.0 when the
    /// template or order differ.
    pub fn similarity(&self, other: &Fingerprint) -> f32 {
        if self.template_id != other.template_id || self.order != other.order {
            return 0.0;
        }
        if self.picks.is_empty() {
            return 1.0;
        }
        let shared = self
            .picks
            .iter()
            .filter(|(slot, option)| other.picks.get(*slot) == Some(*option))
            .count();
        shared as f32 / self.picks.len() as f32
    }
}

#[derive(Clone, Debug)]
pub struct GenerationHistory {
    entries: VecDeque<Fingerprint>,
    capacity: usize,
}

impl GenerationHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends, evicting the oldest entry once full.
    pub fn record(&mut self, fingerprint: Fingerprint) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(fingerprint);
    }

    /// True if `candidate` resembles one of the `window` most recent entries
    /// (`None` checks the whole history) at or above `ratio`.
    pub fn is_near_duplicate(
        &self,
        candidate: &Fingerprint,
        ratio: f32,
        window: Option<usize>,
    ) -> bool {
        let window = window.unwrap_or(self.entries.len());
        self.entries
            .iter()
            .rev()
            .take(window)
            .any(|entry| entry.similarity(candidate) >= ratio)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fingerprint> {
        self.entries.iter()
    }
}
