use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use crate::key::IdPositionMap;
use crate::tree::{FlatItem, TreeItem, flatten_forest};
use crate::{OccurrenceKey, PositionedItem};

/// The immutable flattened source plus its lookup maps.
///
/// Built once in a strategy constructor. Hierarchical strategies never mutate
/// it; the flat strategy replaces payloads and bumps versions in place.
#[derive(Clone, Debug)]
pub(crate) struct Sequence<T> {
    flat: Vec<FlatItem<T>>,
    position_of: IdPositionMap,
    versions: Vec<u64>,
    max_depth: usize,
}

impl<T: TreeItem + Clone> Sequence<T> {
    pub fn from_forest(roots: &[T]) -> Self {
        Self::from_flat(flatten_forest(roots))
    }

    /// Builds a flat (depth 0, no ancestors) sequence.
    pub fn from_items(items: &[T]) -> Self {
        Self::from_flat(
            items
                .iter()
                .map(|item| FlatItem {
                    data: item.clone(),
                    id: item.id().to_string(),
                    depth: 0,
                    parents: Vec::new(),
                })
                .collect(),
        )
    }

    fn from_flat(flat: Vec<FlatItem<T>>) -> Self {
        let mut position_of = IdPositionMap::new();
        let mut max_depth = 0;
        for (position, item) in flat.iter().enumerate() {
            // Duplicate ids overwrite: last write wins, per the caller
            // contract on id uniqueness.
            position_of.insert(item.id.clone(), position);
            max_depth = max_depth.max(item.depth);
        }
        let versions = vec![0; flat.len()];
        Self {
            flat,
            position_of,
            versions,
            max_depth,
        }
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn item(&self, flat_position: usize) -> &FlatItem<T> {
        &self.flat[flat_position]
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.position_of.get(id).copied()
    }

    pub fn data(&self, id: &str) -> Option<&T> {
        self.position_of(id).map(|p| &self.flat[p].data)
    }

    pub fn replace_data(&mut self, id: &str, data: T, increment_version: bool) -> bool {
        let Some(position) = self.position_of(id) else {
            return false;
        };
        self.flat[position].data = data;
        if increment_version {
            self.versions[position] = self.versions[position].wrapping_add(1);
        }
        true
    }

    /// Constructs the occurrence of the item at `flat_position` for the given
    /// absolute index.
    pub fn occurrence(&self, flat_position: usize, index: i64) -> PositionedItem {
        PositionedItem {
            key: OccurrenceKey::new(self.flat[flat_position].id.clone(), index),
            offset: 0,
            version: self.versions[flat_position],
            flat_position,
        }
    }

    /// Maps a scroll position and slot count to natural candidate items.
    ///
    /// Per slot: `abs = position + slot`; the flat position is `abs` reduced
    /// into `[0, n)` (euclidean modulo canonicalizes negatives), so the
    /// sequence repeats infinitely in both directions. An empty source yields
    /// an empty result with no further processing.
    pub fn natural_slots(&self, position: i64, viewport_slots: usize) -> Vec<PositionedItem> {
        let n = self.flat.len() as i64;
        if n == 0 {
            return Vec::new();
        }
        (0..viewport_slots)
            .map(|slot| {
                let abs = position + slot as i64;
                let flat_position = abs.rem_euclid(n) as usize;
                let mut item = self.occurrence(flat_position, abs);
                item.offset = slot;
                item
            })
            .collect()
    }
}
