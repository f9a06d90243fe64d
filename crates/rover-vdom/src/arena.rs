use crate::node::{Node, NodeData, NodeId};
use crate::sibling;

/// Tree links of a single node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Links {
    pub parent: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

/// Which of an element's two child orderings an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildList {
    /// Every child, in document order. Owns the sibling links.
    All,
    /// Element children only
    Pure,
}

/// Arena storage for the nodes of one document.
///
/// Slots are never recycled: a `NodeId` names the same node for the whole
/// life of the document, which keeps refs on the native side unambiguous.
pub struct NodeArena {
    nodes: Vec<Option<Node>>,
    links: Vec<Links>,
    children: Vec<Vec<NodeId>>,
    pure_children: Vec<Vec<NodeId>>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            children: Vec::new(),
            pure_children: Vec::new(),
        }
    }

    pub(crate) fn create(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Some(Node::new(id, data)));
        self.links.push(Links::default());
        self.children.push(Vec::new());
        self.pure_children.push(Vec::new());
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())?.as_mut()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    pub fn links(&self, id: NodeId) -> Links {
        self.links.get(id.index()).copied().unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.links(id).parent
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(links) = self.links.get_mut(id.index()) {
            links.parent = parent;
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pure_children(&self, id: NodeId) -> &[NodeId] {
        self.pure_children.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn insert_child(
        &mut self,
        parent: NodeId,
        list: ChildList,
        node: NodeId,
        index: usize,
    ) -> usize {
        match list {
            ChildList::All => sibling::insert_index(
                &mut self.children[parent.index()],
                node,
                index,
                Some(self.links.as_mut_slice()),
            ),
            ChildList::Pure => {
                sibling::insert_index(&mut self.pure_children[parent.index()], node, index, None)
            }
        }
    }

    pub(crate) fn move_child(
        &mut self,
        parent: NodeId,
        list: ChildList,
        node: NodeId,
        index: usize,
    ) -> Option<usize> {
        match list {
            ChildList::All => sibling::move_index(
                &mut self.children[parent.index()],
                node,
                index,
                Some(self.links.as_mut_slice()),
            ),
            ChildList::Pure => {
                sibling::move_index(&mut self.pure_children[parent.index()], node, index, None)
            }
        }
    }

    pub(crate) fn remove_child(
        &mut self,
        parent: NodeId,
        list: ChildList,
        node: NodeId,
    ) -> Option<usize> {
        match list {
            ChildList::All => sibling::remove_index(
                &mut self.children[parent.index()],
                node,
                Some(self.links.as_mut_slice()),
            ),
            ChildList::Pure => {
                sibling::remove_index(&mut self.pure_children[parent.index()], node, None)
            }
        }
    }

    /// Empty both child lists of `parent`, returning the full list
    pub(crate) fn take_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let Some(children) = self.children.get_mut(parent.index()) else {
            return Vec::new();
        };
        let children = std::mem::take(children);
        self.pure_children[parent.index()].clear();
        for &child in &children {
            self.links[child.index()] = Links::default();
        }
        children
    }

    /// Drop a node's slot. Its children must already have been taken.
    pub(crate) fn dispose(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.get_mut(id.index())?.take()?;
        self.links[id.index()] = Links::default();
        self.children[id.index()] = Vec::new();
        self.pure_children[id.index()] = Vec::new();
        Some(node)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}
