use alloc::string::{String, ToString};

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use alloc::format;

#[cfg(feature = "std")]
pub(crate) type IdPositionMap = HashMap<String, usize>;
#[cfg(not(feature = "std"))]
pub(crate) type IdPositionMap = BTreeMap<String, usize>;

#[cfg(feature = "std")]
pub(crate) type KeyStateMap<V> = HashMap<OccurrenceKey, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyStateMap<V> = BTreeMap<OccurrenceKey, V>;

/// The separator used by the legacy composite string form (`"<id>__<index>"`).
pub const COMPOSITE_SEPARATOR: &str = "__";

/// Identity of one occurrence of a logical item in the infinite address space.
///
/// The same logical item reappears every full loop of the flattened sequence;
/// the absolute `index` disambiguates occurrences so repeated items never
/// collide in per-key caches.
///
/// The legacy string form `"<id>__<index>"` is still available via
/// [`core::fmt::Display`] and [`OccurrenceKey::parse_composite`] for
/// interoperability, but the structured key is authoritative.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccurrenceKey {
    /// Original item id, unique within the source tree.
    pub id: String,
    /// Signed absolute position in the infinite (modulo-addressed) sequence.
    pub index: i64,
}

impl OccurrenceKey {
    pub fn new(id: impl Into<String>, index: i64) -> Self {
        Self {
            id: id.into(),
            index,
        }
    }

    /// Renders the legacy composite form, e.g. `"child1__42"`.
    pub fn composite(&self) -> String {
        format!("{}{}{}", self.id, COMPOSITE_SEPARATOR, self.index)
    }

    /// Parses the legacy composite form by splitting at the *last* `"__"`.
    ///
    /// This mirrors the historical behavior and is only reliable when original
    /// ids never contain `"__"`. Ids that do contain the separator still
    /// round-trip through [`OccurrenceKey::composite`] as long as the index
    /// suffix parses, but `parse_composite` on arbitrary strings is ambiguous
    /// by construction. This is a documented constraint on id values, not a
    /// defect to work around here.
    pub fn parse_composite(composite: &str) -> Option<Self> {
        let at = composite.rfind(COMPOSITE_SEPARATOR)?;
        let (id, rest) = composite.split_at(at);
        let index: i64 = rest[COMPOSITE_SEPARATOR.len()..].parse().ok()?;
        Some(Self {
            id: id.to_string(),
            index,
        })
    }
}

impl core::fmt::Display for OccurrenceKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}{}", self.id, COMPOSITE_SEPARATOR, self.index)
    }
}
