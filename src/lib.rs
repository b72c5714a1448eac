//! Sticky-header resolution and snapshot interpolation for infinite,
//! hierarchical virtual lists.
//!
//! This crate answers two questions for a virtualized list backed by a
//! looping, possibly hierarchical sequence:
//!
//! - which logical items occupy which viewport slot at a given integer scroll
//!   position, with every visible item's ancestor chain kept visible above it
//!   as synthetic "sticky" headers (and, optionally, user-selected items
//!   pinned into view);
//! - how items should interpolate between two adjacent integer positions
//!   (enter/exit opacity, fractional offsets, move/change/sticky flags).
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - a fractional scroll position per animation tick
//! - the viewport slot count
//! - rendering of the returned per-item state
//!
//! Scroll-event capture, layout, pixel sizing, and animated scroll-to helpers
//! live in adapters, not here.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod diff;
mod error;
mod key;
mod section;
mod selection;
mod sequence;
mod sticky;
mod strategy;
mod tree;
mod types;


pub use diff::{FrameInterpolator, PrevFrameMap, diff_snapshots};
pub use error::{Error, Result};
pub use key::{COMPOSITE_SEPARATOR, OccurrenceKey};
pub use selection::SelectionChange;
pub use strategy::{
    DEFAULT_TOTAL_POSITIONS, FlatStrategy, HierarchyStrategy, ScrollStrategy, SelectionStrategy,
    StrategyOptions,
};
pub use tree::TreeItem;
pub use types::{PositionedItem, PrevItemState, RenderItem};
