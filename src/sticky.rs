use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use crate::PositionedItem;
use crate::section::Section;
use crate::sequence::Sequence;
use crate::tree::TreeItem;

/// Computes the sticky-header stack for a resolved set of sections.
///
/// This is a pure function over an explicit stack value: `seed` is the
/// initial stack (selection pre-seeding, or empty), and the returned stack is
/// final, with offsets `0..len` assigned. The caller overlays it onto the
/// natural slots via [`merge_with_stack`].
///
/// Per section, a convergence loop runs until every uncovered item has its
/// ancestor chain represented:
/// 1. Items whose natural offset falls inside the effective stack are
///    "covered" (a header occupies that slot) and skipped.
/// 2. Scanning bottom-up, the first uncovered item with an unsatisfied
///    ancestor forces that ancestor's occurrence onto the section stack,
///    evicting the bottom of the carried stack to make room, and restarts
///    the scan.
/// 3. A scan that finds nothing missing resolves the section. A section with
///    no uncovered items at all concludes the whole computation: the stack
///    already owns every remaining slot.
///
/// When a selection set is supplied, each pass first promotes any covered
/// selected item before scanning for missing ancestors. Scanning only the
/// current section is complete: the stack grows only while forcing or
/// rescuing items of the section it is covering into, so a natural
/// occurrence newly hidden under it always belongs to the section being
/// resolved — earlier sections' covered slots were final when they resolved.
///
/// Every restart grows the combined stack or ends the loop, so termination is
/// bounded by ancestor depth times section length. A defensive cap turns a
/// malformed input (cyclic ancestry, duplicate ids) into a truncated result
/// instead of a hang.
pub(crate) fn resolve_sticky<T>(
    seq: &Sequence<T>,
    sections: &[Section],
    seed: Vec<PositionedItem>,
    selected: Option<&BTreeSet<String>>,
    viewport_slots: usize,
) -> Vec<PositionedItem>
where
    T: TreeItem + Clone,
{
    let mut stack = seed;

    for section in sections {
        let mut current: Vec<PositionedItem> = Vec::new();
        let cap = convergence_cap(seq, section, stack.len());
        let mut iterations = 0usize;

        let concluded = loop {
            iterations += 1;
            if iterations > cap {
                swarn!(
                    iterations,
                    cap,
                    stack_len = stack.len(),
                    "sticky convergence cap exceeded; input likely malformed"
                );
                debug_assert!(
                    iterations <= cap,
                    "sticky convergence cap exceeded (cap={cap})"
                );
                break false;
            }

            let effective_count = stack.len() + current.len();

            // A growing header stack must not silently hide a selected item:
            // promote covered selected items into the section stack first.
            if let Some(selected) = selected {
                let rescue = section.items.iter().find(|item| {
                    item.offset < effective_count
                        && selected.contains(item.original_id())
                        && !in_effective(&stack, &current, item.original_id())
                });
                if let Some(item) = rescue {
                    strace!(id = %item.key.id, index = item.index(), "promoting covered selection");
                    current.push(item.clone());
                    continue;
                }
            }

            let mut any_uncovered = false;
            let mut forced = None;
            // Bottom-up: highest offset first.
            for item in section.items.iter().rev() {
                if item.offset < effective_count {
                    continue;
                }
                any_uncovered = true;
                if let Some(parent) = missing_parent(
                    seq,
                    section,
                    item,
                    effective_count,
                    &stack,
                    &current,
                ) {
                    forced = Some(parent);
                    break;
                }
            }

            match forced {
                Some(parent) => {
                    // Conflict resolution: an older stuck header is displaced
                    // by one needed deeper in, unless it is a selected item.
                    if let Some(bottom) = stack.last() {
                        let protected =
                            selected.is_some_and(|s| s.contains(bottom.original_id()));
                        if !protected {
                            stack.pop();
                        }
                    }
                    strace!(id = %parent.key.id, index = parent.index(), "pushing sticky header");
                    current.push(parent);
                }
                None => break !any_uncovered,
            }
        };

        stack.append(&mut current);
        if concluded {
            // Every slot in this section is already a header; the list is
            // stable as-is.
            break;
        }
    }

    finish(stack, viewport_slots)
}

/// Overlays the sticky stack onto the natural slots: stack entries own the
/// top `stack.len()` offsets, natural items keep the rest. The result is
/// offset-sorted with exactly one item per slot.
pub(crate) fn merge_with_stack(
    natural: Vec<PositionedItem>,
    stack: Vec<PositionedItem>,
) -> Vec<PositionedItem> {
    let mut out = stack;
    for item in natural.into_iter().skip(out.len()) {
        out.push(item);
    }
    out
}

fn finish(mut stack: Vec<PositionedItem>, viewport_slots: usize) -> Vec<PositionedItem> {
    // More headers than slots only happens past the documented limitations
    // (e.g. more selected items than the viewport can hold).
    stack.truncate(viewport_slots);
    for (offset, item) in stack.iter_mut().enumerate() {
        item.offset = offset;
    }
    stack
}

fn convergence_cap<T>(seq: &Sequence<T>, section: &Section, carried: usize) -> usize
where
    T: TreeItem + Clone,
{
    (seq.max_depth() + 2) * (section.items.len() + carried + 4)
}

fn in_effective(stack: &[PositionedItem], current: &[PositionedItem], id: &str) -> bool {
    stack
        .iter()
        .chain(current.iter())
        .any(|item| item.original_id() == id)
}

/// Walks `item`'s ancestor chain root-first and returns the occurrence of the
/// first ancestor that is neither on the effective stack nor naturally
/// visible below it.
///
/// "Naturally visible" is occurrence-exact: the infinite structure repeats,
/// so the satisfying parent instance must be the one from the same loop
/// iteration as the child, exactly `child_flat - parent_flat` slots before it
/// in absolute terms.
fn missing_parent<T>(
    seq: &Sequence<T>,
    section: &Section,
    item: &PositionedItem,
    effective_count: usize,
    stack: &[PositionedItem],
    current: &[PositionedItem],
) -> Option<PositionedItem>
where
    T: TreeItem + Clone,
{
    let child_flat = item.flat_position;
    let child_abs = item.index();

    for &parent_flat in &seq.item(child_flat).parents {
        let parent_id = &seq.item(parent_flat).id;
        if in_effective(stack, current, parent_id) {
            continue;
        }

        let distance = child_flat as i64 - parent_flat as i64;
        let parent_abs = child_abs - distance;
        let visible_naturally = section.items.iter().any(|other| {
            other.offset >= effective_count
                && other.flat_position == parent_flat
                && other.index() == parent_abs
        });
        if visible_naturally {
            continue;
        }

        return Some(seq.occurrence(parent_flat, parent_abs));
    }

    None
}
