use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Minimal capability contract for caller-owned tree payloads.
///
/// The core only needs a stable id and (for hierarchical strategies) an
/// ordered child sequence. Payload fields beyond that are opaque and travel
/// through the pipeline untouched.
///
/// Ids must be unique within the source tree; duplicates are a caller
/// contract violation (lookup maps are last-write-wins).
pub trait TreeItem {
    fn id(&self) -> &str;

    /// Ordered children. Flat strategies never consult this.
    fn children(&self) -> &[Self]
    where
        Self: Sized,
    {
        &[]
    }
}

/// One node of the flattened sequence, derived once at construction.
#[derive(Clone, Debug)]
pub(crate) struct FlatItem<T> {
    pub data: T,
    pub id: String,
    pub depth: usize,
    /// Ancestor flat positions, root-first, excluding self.
    ///
    /// Pre-order flattening guarantees every ancestor is flattened before its
    /// descendants, so these positions are always valid.
    pub parents: Vec<usize>,
}

/// Flattens an ordered forest depth-first, pre-order (a node before its
/// children, children in given order), recording depth and ancestor trail
/// incrementally during the walk.
pub(crate) fn flatten_forest<T: TreeItem + Clone>(roots: &[T]) -> Vec<FlatItem<T>> {
    let mut out = Vec::new();
    let mut trail: Vec<usize> = Vec::new();
    for root in roots {
        walk(root, &mut trail, &mut out);
    }
    out
}

fn walk<T: TreeItem + Clone>(node: &T, trail: &mut Vec<usize>, out: &mut Vec<FlatItem<T>>) {
    let position = out.len();
    out.push(FlatItem {
        data: node.clone(),
        id: node.id().to_string(),
        depth: trail.len(),
        parents: trail.clone(),
    });
    trail.push(position);
    for child in node.children() {
        walk(child, trail, out);
    }
    trail.pop();
}
