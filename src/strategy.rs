use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::diff::floor_i64;
use crate::error::{Error, Result};
use crate::section::group_sections;
use crate::selection::{SelectionChange, SelectionState};
use crate::sequence::Sequence;
use crate::sticky::{merge_with_stack, resolve_sticky};
use crate::tree::TreeItem;
use crate::{OccurrenceKey, PositionedItem};

/// Default addressable scroll range.
///
/// Large on purpose: infinite variants loop the flattened sequence, so the
/// range only bounds the consumer's scrollbar, not the content.
pub const DEFAULT_TOTAL_POSITIONS: i64 = 1_000_000;

/// Configuration shared by all strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyOptions {
    /// Total addressable scroll range, for scrollbar sizing. Not tied to the
    /// true sequence length.
    pub total_positions: i64,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            total_positions: DEFAULT_TOTAL_POSITIONS,
        }
    }
}

impl StrategyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_total_positions(mut self, total_positions: i64) -> Self {
        self.total_positions = total_positions;
        self
    }
}

/// The core query contract every strategy variant satisfies.
///
/// Queries are pure and synchronous: no operation suspends, blocks, or
/// performs I/O, and results depend only on the immutable flat sequence plus
/// (for the selection variant) the current selection set.
pub trait ScrollStrategy<T> {
    /// Resolves which items occupy which viewport slot at an integer scroll
    /// position.
    ///
    /// For a non-empty source the result has exactly `viewport_slots` items
    /// with offsets `0..viewport_slots`, strictly increasing. An empty source
    /// yields an empty list.
    fn items_at_position(&self, position: i64, viewport_slots: usize) -> Vec<PositionedItem>;

    /// Looks up the payload behind an occurrence.
    fn item_data(&self, key: &OccurrenceKey) -> Result<&T>;

    /// Total addressable scroll range (scrollbar sizing).
    fn total_positions(&self) -> i64;

    /// Suggested starting position: the midpoint of the range, so the
    /// consumer can scroll in both directions from the start.
    fn initial_position(&self) -> i64 {
        self.total_positions() / 2
    }

    /// Convenience lookup from the legacy `"<id>__<index>"` string form.
    fn item_data_by_composite(&self, composite: &str) -> Result<&T> {
        let key =
            OccurrenceKey::parse_composite(composite).ok_or_else(|| Error::MalformedKey {
                composite: composite.to_string(),
            })?;
        self.item_data(&key)
    }
}

fn lookup<'a, T: TreeItem + Clone>(seq: &'a Sequence<T>, key: &OccurrenceKey) -> Result<&'a T> {
    seq.data(&key.id).ok_or_else(|| Error::NotFound {
        id: key.id.clone(),
    })
}

/// Looping strategy over a flat (non-hierarchical) sequence.
///
/// No sticky pass runs: natural modulo resolution is already final. This is
/// the only variant that supports in-place mutation of the source.
#[derive(Clone, Debug)]
pub struct FlatStrategy<T> {
    seq: Sequence<T>,
    options: StrategyOptions,
}

impl<T: TreeItem + Clone> FlatStrategy<T> {
    pub fn new(items: &[T]) -> Self {
        Self::with_options(items, StrategyOptions::default())
    }

    pub fn with_options(items: &[T], options: StrategyOptions) -> Self {
        sdebug!(count = items.len(), "FlatStrategy::new");
        Self {
            seq: Sequence::from_items(items),
            options,
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Replaces the payload behind `id`, optionally bumping its version so
    /// the next diff reports `has_changed`.
    pub fn update_item(&mut self, id: &str, data: T, increment_version: bool) -> Result<()> {
        if self.seq.replace_data(id, data, increment_version) {
            Ok(())
        } else {
            Err(Error::NotFound { id: id.to_string() })
        }
    }

    /// Replaces the whole source. All versions reset to 0.
    pub fn set_items(&mut self, items: &[T]) {
        sdebug!(count = items.len(), "FlatStrategy::set_items");
        self.seq = Sequence::from_items(items);
    }
}

impl<T: TreeItem + Clone> ScrollStrategy<T> for FlatStrategy<T> {
    fn items_at_position(&self, position: i64, viewport_slots: usize) -> Vec<PositionedItem> {
        self.seq.natural_slots(position, viewport_slots)
    }

    fn item_data(&self, key: &OccurrenceKey) -> Result<&T> {
        lookup(&self.seq, key)
    }

    fn total_positions(&self) -> i64 {
        self.options.total_positions
    }
}

/// Looping strategy over a hierarchy, with sticky-header resolution.
///
/// Every returned item's ancestor chain is represented at smaller offsets,
/// synthesizing header occurrences when an ancestor has scrolled out of the
/// natural view. The tree is immutable for the strategy's lifetime.
///
/// Known limitations (documented, not defended against): results may be
/// incorrect when a section is shorter than the sticky stack it must carry or
/// when the hierarchy is deeper than the viewport.
#[derive(Clone, Debug)]
pub struct HierarchyStrategy<T> {
    seq: Sequence<T>,
    options: StrategyOptions,
}

impl<T: TreeItem + Clone> HierarchyStrategy<T> {
    pub fn new(roots: &[T]) -> Self {
        Self::with_options(roots, StrategyOptions::default())
    }

    pub fn with_options(roots: &[T], options: StrategyOptions) -> Self {
        let seq = Sequence::from_forest(roots);
        sdebug!(
            count = seq.len(),
            max_depth = seq.max_depth(),
            "HierarchyStrategy::new"
        );
        Self { seq, options }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

impl<T: TreeItem + Clone> ScrollStrategy<T> for HierarchyStrategy<T> {
    fn items_at_position(&self, position: i64, viewport_slots: usize) -> Vec<PositionedItem> {
        let natural = self.seq.natural_slots(position, viewport_slots);
        if natural.is_empty() {
            return natural;
        }
        let sections = group_sections(&self.seq, &natural);
        let stack = resolve_sticky(&self.seq, &sections, Vec::new(), None, viewport_slots);
        merge_with_stack(natural, stack)
    }

    fn item_data(&self, key: &OccurrenceKey) -> Result<&T> {
        lookup(&self.seq, key)
    }

    fn total_positions(&self) -> i64 {
        self.options.total_positions
    }
}

/// [`HierarchyStrategy`] plus selection pinning.
///
/// Selected items are never scrolled out of reach: when a selected item's
/// natural occurrence is not in view, an occurrence is seeded into the sticky
/// stack; when header growth would cover it, it is promoted; and conflict
/// resolution never evicts it. With more selected items than viewport slots
/// the guarantee degrades (documented limitation).
#[derive(Clone, Debug)]
pub struct SelectionStrategy<T> {
    seq: Sequence<T>,
    options: StrategyOptions,
    selection: SelectionState,
}

impl<T: TreeItem + Clone> SelectionStrategy<T> {
    pub fn new(roots: &[T]) -> Self {
        Self::with_options(roots, StrategyOptions::default())
    }

    pub fn with_options(roots: &[T], options: StrategyOptions) -> Self {
        let seq = Sequence::from_forest(roots);
        sdebug!(
            count = seq.len(),
            max_depth = seq.max_depth(),
            "SelectionStrategy::new"
        );
        Self {
            seq,
            options,
            selection: SelectionState::new(),
        }
    }

    pub fn select(&mut self, id: &str) -> SelectionChange {
        self.selection.select(id)
    }

    pub fn deselect(&mut self, id: &str) -> SelectionChange {
        self.selection.deselect(id)
    }

    pub fn toggle_selection(&mut self, id: &str) -> SelectionChange {
        self.selection.toggle(id)
    }

    pub fn selected_ids(&self) -> &BTreeSet<String> {
        self.selection.ids()
    }

    /// Monotonic counter bumped on every effective selection mutation; cheap
    /// to poll across frames.
    pub fn selection_generation(&self) -> u64 {
        self.selection.generation()
    }

    /// Seeds the sticky stack with an occurrence for every selected id that
    /// has no natural occurrence in view: the closest occurrence at or before
    /// the query position, sorted by absolute index.
    fn seed_selected(&self, position: i64, natural: &[PositionedItem]) -> Vec<PositionedItem> {
        let n = self.seq.len() as i64;
        let mut seeds: Vec<PositionedItem> = Vec::new();
        for id in self.selection.ids() {
            if natural.iter().any(|item| item.original_id() == id.as_str()) {
                continue;
            }
            let Some(flat_position) = self.seq.position_of(id) else {
                continue;
            };
            let mut occurrence = position.div_euclid(n) * n + flat_position as i64;
            if occurrence > position {
                occurrence -= n;
            }
            seeds.push(self.seq.occurrence(flat_position, occurrence));
        }
        seeds.sort_by_key(|item| item.index());
        seeds
    }

    /// Searches for the closest position at or before `current_position`
    /// where the item would appear at its natural (non-sticky) slot, so the
    /// consumer can scroll there before deselecting without the item jumping.
    ///
    /// Bounded linear probe over at most `2 × n` positions; returns the
    /// floored original position when nothing qualifies. The id is
    /// temporarily deselected during the search and always restored.
    pub fn find_safe_scroll_position(
        &mut self,
        id: &str,
        current_position: f64,
        viewport_slots: usize,
    ) -> i64 {
        let origin = floor_i64(current_position);
        if self.seq.is_empty() {
            return origin;
        }

        let was_selected = self.selection.contains(id);
        if was_selected {
            self.selection.deselect(id);
        }

        let n = self.seq.len() as i64;
        let mut found = origin;
        for step in 0..(2 * n) {
            let position = origin - step;
            let resolved = self.items_at_position(position, viewport_slots);
            let natural = self.seq.natural_slots(position, viewport_slots);
            let natural_here = resolved.iter().any(|item| {
                item.original_id() == id
                    && natural
                        .iter()
                        .any(|nat| nat.key == item.key && nat.offset == item.offset)
            });
            if natural_here {
                found = position;
                break;
            }
        }

        if was_selected {
            self.selection.select(id);
        }
        strace!(id, origin, found, "find_safe_scroll_position");
        found
    }
}

impl<T: TreeItem + Clone> ScrollStrategy<T> for SelectionStrategy<T> {
    fn items_at_position(&self, position: i64, viewport_slots: usize) -> Vec<PositionedItem> {
        let natural = self.seq.natural_slots(position, viewport_slots);
        if natural.is_empty() {
            return natural;
        }
        let seed = self.seed_selected(position, &natural);
        let sections = group_sections(&self.seq, &natural);
        let stack = resolve_sticky(
            &self.seq,
            &sections,
            seed,
            Some(self.selection.ids()),
            viewport_slots,
        );
        merge_with_stack(natural, stack)
    }

    fn item_data(&self, key: &OccurrenceKey) -> Result<&T> {
        lookup(&self.seq, key)
    }

    fn total_positions(&self) -> i64 {
        self.options.total_positions
    }
}
