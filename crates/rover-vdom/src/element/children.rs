use crate::arena::ChildList;
use crate::document::Document;
use crate::listener::ChildIndex;
use crate::node::NodeId;
use crate::sibling::{next_element, previous_element};
use tracing::{debug, warn};

/// How an accepted insertion treats the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Detached node joining `parent`
    Insert,
    /// Existing child changing position
    Reorder,
}

impl Document {
    /// Make `node` the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) {
        let Some(placement) = self.placement(parent, node) else {
            return;
        };

        let end = self.nodes.children(parent).len();
        let pure_end = self.nodes.pure_children(parent).len();
        match placement {
            Placement::Insert => {
                self.link_parent(node, parent);
                self.nodes.insert_child(parent, ChildList::All, node, end);
                if self.nodes.is_element(node) {
                    self.nodes.insert_child(parent, ChildList::Pure, node, pure_end);
                    self.announce_added(parent, node, ChildIndex::Append);
                }
            }
            Placement::Reorder => {
                self.nodes.move_child(parent, ChildList::All, node, end);
                if self.nodes.is_element(node) {
                    if let Some(index) =
                        self.nodes.move_child(parent, ChildList::Pure, node, pure_end)
                    {
                        self.announce_moved(parent, node, index);
                    }
                }
            }
        }
        self.check_invariant(parent);
    }

    /// Place `node` immediately before `before`, a child of `parent`
    pub fn insert_before(&mut self, parent: NodeId, node: NodeId, before: NodeId) {
        if node == before || self.nodes.links(node).next == Some(before) {
            debug!(node = %node, before = %before, "insert_before: already in place");
            return;
        }
        let Some(placement) = self.placement(parent, node) else {
            return;
        };
        let Some(index) = self.child_position(parent, before) else {
            debug!(parent = %parent, before = %before, "insert_before: reference is not a child");
            return;
        };

        match placement {
            Placement::Insert => {
                self.link_parent(node, parent);
                self.nodes.insert_child(parent, ChildList::All, node, index);
                if self.nodes.is_element(node) {
                    let pure_index = self.pure_position_before(parent, before);
                    let index = self
                        .nodes
                        .insert_child(parent, ChildList::Pure, node, pure_index);
                    self.announce_added(parent, node, ChildIndex::At(index));
                }
            }
            Placement::Reorder => {
                self.nodes.move_child(parent, ChildList::All, node, index);
                if self.nodes.is_element(node) {
                    let pure_index = self.pure_position_before(parent, before);
                    if let Some(index) =
                        self.nodes
                            .move_child(parent, ChildList::Pure, node, pure_index)
                    {
                        self.announce_moved(parent, node, index);
                    }
                }
            }
        }
        self.check_invariant(parent);
    }

    /// Place `node` immediately after `after`, a child of `parent`
    pub fn insert_after(&mut self, parent: NodeId, node: NodeId, after: NodeId) {
        if node == after || self.nodes.links(node).prev == Some(after) {
            debug!(node = %node, after = %after, "insert_after: already in place");
            return;
        }
        let Some(placement) = self.placement(parent, node) else {
            return;
        };
        let Some(index) = self.child_position(parent, after).map(|i| i + 1) else {
            debug!(parent = %parent, after = %after, "insert_after: reference is not a child");
            return;
        };

        match placement {
            Placement::Insert => {
                self.link_parent(node, parent);
                self.nodes.insert_child(parent, ChildList::All, node, index);
                if self.nodes.is_element(node) {
                    let pure_index = self.pure_position_after(parent, after);
                    let index = self
                        .nodes
                        .insert_child(parent, ChildList::Pure, node, pure_index);
                    self.announce_added(parent, node, ChildIndex::At(index));
                }
            }
            Placement::Reorder => {
                self.nodes.move_child(parent, ChildList::All, node, index);
                if self.nodes.is_element(node) {
                    let pure_index = self.pure_position_after(parent, after);
                    if let Some(index) =
                        self.nodes
                            .move_child(parent, ChildList::Pure, node, pure_index)
                    {
                        self.announce_moved(parent, node, index);
                    }
                }
            }
        }
        self.check_invariant(parent);
    }

    /// Detach `node` from `parent`. Unless `preserved`, the node and its
    /// subtree are destroyed afterwards, whether or not it was attached.
    pub fn remove_child(&mut self, parent: NodeId, node: NodeId, preserved: bool) {
        if !self.nodes.contains(parent) || !self.nodes.contains(node) {
            warn!(parent = %parent, node = %node, "remove_child: unknown node");
            return;
        }
        if node == self.document_element() {
            warn!(doc = %self.id, "remove_child: the document element has no parent");
            return;
        }

        match self.nodes.parent(node) {
            Some(current) if current == parent => {
                self.nodes.remove_child(parent, ChildList::All, node);
                self.nodes.set_parent(node, None);
                if self.nodes.is_element(node) {
                    self.nodes.remove_child(parent, ChildList::Pure, node);
                    if let Some(listener) = self.listener_for(parent) {
                        listener.remove_element(node);
                    }
                }
                self.unregister_subtree(node);
                self.check_invariant(parent);
            }
            Some(current) => {
                debug!(node = %node, parent = %current, "remove_child: owned by another parent");
                return;
            }
            None => {}
        }

        if !preserved {
            self.destroy_subtree(node);
        }
    }

    /// Remove and destroy every child of `parent`
    pub fn clear(&mut self, parent: NodeId) {
        if !self.nodes.is_element(parent) {
            warn!(parent = %parent, "clear: not an element");
            return;
        }

        if self.will_notify(parent) {
            let removed = self.nodes.pure_children(parent).to_vec();
            if let Some(listener) = self.listener_for(parent) {
                for child in removed {
                    listener.remove_element(child);
                }
            }
        }

        for child in self.nodes.take_children(parent) {
            self.destroy_subtree(child);
        }
    }

    /// Decide whether `node` may be inserted under `parent`, and how
    fn placement(&self, parent: NodeId, node: NodeId) -> Option<Placement> {
        if !self.nodes.is_element(parent) {
            warn!(parent = %parent, "insert: parent is not a live element");
            return None;
        }
        if !self.nodes.contains(node) {
            warn!(node = %node, "insert: unknown node");
            return None;
        }

        match self.nodes.parent(node) {
            Some(current) if current == parent => Some(Placement::Reorder),
            Some(current) => {
                debug!(node = %node, parent = %current, "insert: owned by another parent");
                None
            }
            None if node == self.document_element() || self.is_ancestor_or_self(node, parent) => {
                debug!(node = %node, parent = %parent, "insert: would create a cycle");
                None
            }
            None => Some(Placement::Insert),
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.nodes.parent(id);
        }
        false
    }

    fn link_parent(&mut self, node: NodeId, parent: NodeId) {
        self.nodes.set_parent(node, Some(parent));
        if self.is_attached(parent) {
            self.register_subtree(node);
        }
    }

    fn child_position(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes.children(parent).iter().position(|&id| id == child)
    }

    fn pure_position(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes
            .pure_children(parent)
            .iter()
            .position(|&id| id == child)
    }

    // First element at or after `before` marks the pure insertion point
    fn pure_position_before(&self, parent: NodeId, before: NodeId) -> usize {
        next_element(&self.nodes, before)
            .and_then(|element| self.pure_position(parent, element))
            .unwrap_or_else(|| self.nodes.pure_children(parent).len())
    }

    // Slot right after the last element at or before `after`
    fn pure_position_after(&self, parent: NodeId, after: NodeId) -> usize {
        previous_element(&self.nodes, after)
            .and_then(|element| self.pure_position(parent, element))
            .map_or(0, |i| i + 1)
    }

    fn announce_added(&mut self, parent: NodeId, node: NodeId, index: ChildIndex) {
        if !self.will_notify(parent) {
            return;
        }
        let Some(element) = self.to_json(node) else {
            return;
        };
        if let Some(listener) = self.listener_for(parent) {
            listener.add_element(parent, element, index);
        }
    }

    fn announce_moved(&mut self, parent: NodeId, node: NodeId, index: usize) {
        if let Some(listener) = self.listener_for(parent) {
            listener.move_element(node, parent, index);
        }
    }

    fn check_invariant(&self, parent: NodeId) {
        if self.config.check_invariants {
            assert!(
                self.pure_children_consistent(parent),
                "pure children of {parent} diverged from children"
            );
        }
    }
}
