//! Splice helpers for ordered child lists.
//!
//! Each helper edits one list in place. When handed the arena's link table it
//! also rewires `prev`/`next` so sibling pointers keep matching the list order.
//! Only the full child list carries sibling links; the pure list is passed
//! without them.

use crate::arena::{Links, NodeArena};
use crate::node::NodeId;

/// Insert `target` at `index` (clamped to the list length). Returns the index used.
pub(crate) fn insert_index(
    list: &mut Vec<NodeId>,
    target: NodeId,
    index: usize,
    links: Option<&mut [Links]>,
) -> usize {
    let index = index.min(list.len());
    list.insert(index, target);
    if let Some(links) = links {
        link_at(list, index, links);
    }
    index
}

/// Move `target` so it lands where `index` pointed before the move.
///
/// Returns the final index, or `None` when `target` is absent or ends up where
/// it already was.
pub(crate) fn move_index(
    list: &mut Vec<NodeId>,
    target: NodeId,
    index: usize,
    mut links: Option<&mut [Links]>,
) -> Option<usize> {
    let current = list.iter().position(|&id| id == target)?;
    let index = index.min(list.len());
    let dest = if current < index { index - 1 } else { index };
    if dest == current {
        return None;
    }

    if let Some(links) = links.as_deref_mut() {
        unlink_at(list, current, links);
    }
    list.remove(current);
    list.insert(dest, target);
    if let Some(links) = links {
        link_at(list, dest, links);
    }
    Some(dest)
}

/// Remove `target` from the list. Returns the index it occupied.
pub(crate) fn remove_index(
    list: &mut Vec<NodeId>,
    target: NodeId,
    links: Option<&mut [Links]>,
) -> Option<usize> {
    let index = list.iter().position(|&id| id == target)?;
    if let Some(links) = links {
        unlink_at(list, index, links);
    }
    list.remove(index);
    Some(index)
}

/// Closest element at or after `node` in its parent's child order
pub(crate) fn next_element(arena: &NodeArena, node: NodeId) -> Option<NodeId> {
    let mut cursor = Some(node);
    while let Some(id) = cursor {
        if arena.is_element(id) {
            return Some(id);
        }
        cursor = arena.links(id).next;
    }
    None
}

/// Closest element at or before `node` in its parent's child order
pub(crate) fn previous_element(arena: &NodeArena, node: NodeId) -> Option<NodeId> {
    let mut cursor = Some(node);
    while let Some(id) = cursor {
        if arena.is_element(id) {
            return Some(id);
        }
        cursor = arena.links(id).prev;
    }
    None
}

fn link_at(list: &[NodeId], index: usize, links: &mut [Links]) {
    let target = list[index];
    let before = index.checked_sub(1).map(|i| list[i]);
    let after = list.get(index + 1).copied();

    if let Some(before) = before {
        links[before.index()].next = Some(target);
    }
    links[target.index()].prev = before;
    links[target.index()].next = after;
    if let Some(after) = after {
        links[after.index()].prev = Some(target);
    }
}

fn unlink_at(list: &[NodeId], index: usize, links: &mut [Links]) {
    let target = list[index];
    let before = index.checked_sub(1).map(|i| list[i]);
    let after = list.get(index + 1).copied();

    if let Some(before) = before {
        links[before.index()].next = after;
    }
    if let Some(after) = after {
        links[after.index()].prev = before;
    }
    links[target.index()].prev = None;
    links[target.index()].next = None;
}
