use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};

/// Outcome of a selection mutation.
///
/// Mutators return this diff instead of firing a callback, so the core never
/// holds a reference into application code. Consumers that want push-style
/// notification can forward the diff themselves; consumers that poll can
/// compare [`SelectionState::generation`] across frames.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionChange {
    Selected(String),
    Deselected(String),
    /// The mutation was a no-op (id already in the requested state).
    Unchanged,
}

impl SelectionChange {
    pub fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// The set of original ids marked selected.
///
/// Independent of any scroll state; persists across queries and is mutated
/// only through this API. Iteration order is sorted (BTreeSet), which keeps
/// selection pre-seeding deterministic.
#[derive(Clone, Debug, Default)]
pub(crate) struct SelectionState {
    ids: BTreeSet<String>,
    generation: u64,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: &str) -> SelectionChange {
        if self.ids.insert(id.to_string()) {
            self.generation = self.generation.wrapping_add(1);
            SelectionChange::Selected(id.to_string())
        } else {
            SelectionChange::Unchanged
        }
    }

    pub fn deselect(&mut self, id: &str) -> SelectionChange {
        if self.ids.remove(id) {
            self.generation = self.generation.wrapping_add(1);
            SelectionChange::Deselected(id.to_string())
        } else {
            SelectionChange::Unchanged
        }
    }

    pub fn toggle(&mut self, id: &str) -> SelectionChange {
        if self.ids.contains(id) {
            self.deselect(id)
        } else {
            self.select(id)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
