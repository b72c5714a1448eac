use crate::OccurrenceKey;

/// One occupied viewport slot in a resolved snapshot.
///
/// Produced fresh on every query; never cached by the core.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionedItem {
    pub key: OccurrenceKey,
    /// 0-based slot within the viewport. Reassigned during sticky resolution.
    pub offset: usize,
    /// Opaque change counter used for data-change detection.
    pub version: u64,
    /// Position in the flattened sequence (for data lookup).
    pub(crate) flat_position: usize,
}

impl PositionedItem {
    /// Signed absolute position in the infinite sequence.
    pub fn index(&self) -> i64 {
        self.key.index
    }

    pub fn original_id(&self) -> &str {
        &self.key.id
    }
}

/// Interpolated per-item render state for one animation frame.
///
/// `offset` is fractional: an item sliding between two slots reports an
/// in-between value. Consumers multiply by their slot height to position it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderItem {
    pub key: OccurrenceKey,
    pub version: u64,
    pub offset: f32,
    pub opacity: f32,
    /// Entered the viewport this frame (no previous-frame entry, or only
    /// present in the ceiling snapshot).
    pub is_appearing: bool,
    /// Only present in the floor snapshot; fading out.
    pub is_disappearing: bool,
    /// Same key, different absolute index than the previous frame (a
    /// structural move rather than a scroll).
    pub is_moving: bool,
    /// The payload version changed since the previous frame.
    pub has_changed: bool,
    /// Pinned: same offset in both snapshots regardless of scroll delta.
    pub is_sticky: bool,
}

impl RenderItem {
    pub fn index(&self) -> i64 {
        self.key.index
    }
}

/// Per-key state retained from the previous frame for diffing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrevItemState {
    pub offset: usize,
    pub index: i64,
    pub version: u64,
}
