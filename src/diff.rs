use alloc::vec::Vec;

use crate::key::KeyStateMap;
use crate::strategy::ScrollStrategy;
use crate::{PositionedItem, PrevItemState, RenderItem};

/// Previous-frame per-key state, keyed by occurrence.
pub type PrevFrameMap = KeyStateMap<PrevItemState>;

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Floor of a finite `f64` as `i64`.
///
/// `f64::floor` is unavailable without `std`; an `as` cast truncates toward
/// zero, so negative values with a fractional part need one more step down.
pub(crate) fn floor_i64(value: f64) -> i64 {
    let truncated = value as i64;
    if (truncated as f64) > value {
        truncated - 1
    } else {
        truncated
    }
}

/// Turns two adjacent-position snapshots into interpolated render state.
///
/// `floor` and `ceil` are resolver outputs for `floor(position)` and
/// `floor(position) + 1`; `t` is the fractional weight in `[0, 1)`. For the
/// union of keys across both snapshots:
///
/// - present in both: offset lerps between the two slots, full opacity;
///   sticky when both snapshots agree on the slot (a pinned header ignores
///   the scroll delta);
/// - only in floor: sliding up and fading out (`opacity = 1 - t`);
/// - only in ceil: sliding in from below and fading in (`opacity = t`).
///
/// The result is sorted by interpolated offset.
pub fn diff_snapshots(
    floor: &[PositionedItem],
    ceil: &[PositionedItem],
    t: f32,
    prev: &PrevFrameMap,
) -> Vec<RenderItem> {
    let mut out = Vec::with_capacity(floor.len() + ceil.len());

    for item in floor {
        let entry = prev.get(&item.key);
        match ceil.iter().find(|other| other.key == item.key) {
            Some(other) => out.push(RenderItem {
                key: item.key.clone(),
                version: item.version,
                offset: lerp(item.offset as f32, other.offset as f32, t),
                opacity: 1.0,
                is_appearing: entry.is_none(),
                is_disappearing: false,
                is_moving: entry.is_some_and(|p| p.index != item.index()),
                has_changed: entry.is_some_and(|p| p.version != item.version),
                is_sticky: item.offset == other.offset,
            }),
            None => out.push(RenderItem {
                key: item.key.clone(),
                version: item.version,
                offset: lerp(item.offset as f32, item.offset as f32 - 1.0, t),
                opacity: 1.0 - t,
                is_appearing: false,
                is_disappearing: true,
                is_moving: false,
                has_changed: false,
                is_sticky: false,
            }),
        }
    }

    for item in ceil {
        if floor.iter().any(|other| other.key == item.key) {
            continue;
        }
        out.push(RenderItem {
            key: item.key.clone(),
            version: item.version,
            offset: lerp(item.offset as f32 + 1.0, item.offset as f32, t),
            opacity: t,
            is_appearing: true,
            is_disappearing: false,
            is_moving: false,
            has_changed: false,
            is_sticky: false,
        });
    }

    out.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    out
}

/// Drives the snapshot pipeline for a continuously advancing fractional
/// position, retaining the per-key cache between frames.
///
/// Call [`FrameInterpolator::advance`] once per animation tick. The
/// interpolator queries the strategy at the floor and ceiling of the position,
/// diffs against the previous frame, and refreshes its cache.
#[derive(Clone, Debug, Default)]
pub struct FrameInterpolator {
    prev: PrevFrameMap,
}

impl FrameInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the retained per-key state; the next frame reports every item
    /// as appearing.
    pub fn reset(&mut self) {
        self.prev.clear();
    }

    pub fn advance<T, S>(
        &mut self,
        strategy: &S,
        position: f64,
        viewport_slots: usize,
    ) -> Vec<RenderItem>
    where
        S: ScrollStrategy<T> + ?Sized,
    {
        let floor_position = floor_i64(position);
        let t = (position - floor_position as f64) as f32;
        strace!(position, floor_position, viewport_slots, "advance");

        let floor = strategy.items_at_position(floor_position, viewport_slots);
        let ceil = strategy.items_at_position(floor_position + 1, viewport_slots);
        let frame = diff_snapshots(&floor, &ceil, t, &self.prev);

        self.prev.clear();
        // Floor entries win on overlap; ceil-only entries are remembered so
        // an item sliding in is not re-reported as appearing next frame.
        for item in ceil.iter().chain(floor.iter()) {
            self.prev.insert(
                item.key.clone(),
                PrevItemState {
                    offset: item.offset,
                    index: item.index(),
                    version: item.version,
                },
            );
        }

        frame
    }
}
