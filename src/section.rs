use alloc::vec;
use alloc::vec::Vec;

use crate::PositionedItem;
use crate::sequence::Sequence;
use crate::tree::TreeItem;

/// A contiguous run of natural slots sharing one root ancestor.
///
/// Sections isolate the seam where the infinite sequence wraps from the end
/// back to the start, so sticky resolution never reasons across a loop
/// boundary. Internal only.
#[derive(Clone, Debug)]
pub(crate) struct Section {
    /// Flat position of the shared root.
    pub root: usize,
    pub items: Vec<PositionedItem>,
}

/// Root of an item: its first (outermost) ancestor, or itself when it has no
/// ancestors.
pub(crate) fn root_of<T>(seq: &Sequence<T>, flat_position: usize) -> usize
where
    T: TreeItem + Clone,
{
    seq.item(flat_position)
        .parents
        .first()
        .copied()
        .unwrap_or(flat_position)
}

/// Partitions the natural-slot list into ordered sections.
///
/// A new section starts when the root ancestor changes or when the flat
/// position decreases (the wrap seam). The result preserves order and covers
/// the input completely.
pub(crate) fn group_sections<T>(seq: &Sequence<T>, natural: &[PositionedItem]) -> Vec<Section>
where
    T: TreeItem + Clone,
{
    let mut sections: Vec<Section> = Vec::new();
    let mut prev_position: Option<usize> = None;

    for item in natural {
        let root = root_of(seq, item.flat_position);
        let wrapped = prev_position.is_some_and(|prev| item.flat_position < prev);

        match sections.last_mut() {
            Some(section) if section.root == root && !wrapped => {
                section.items.push(item.clone());
            }
            _ => sections.push(Section {
                root,
                items: vec![item.clone()],
            }),
        }
        prev_position = Some(item.flat_position);
    }

    sections
}
