use crate::arena::NodeArena;
use crate::config::DocumentConfig;
use crate::element::{ElementData, ElementProps};
use crate::error::Result;
use crate::listener::{Listener, NativeBridge};
use crate::node::{CommentData, Node, NodeData, NodeId, NodeType};
use crate::value::PropMap;
use serde::Serialize;
use smallvec::SmallVec;
use smartstring::alias::String as SmartString;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Tag name of the root element every document starts with
pub const DOCUMENT_ELEMENT_TYPE: &str = "document";

/// Identifier of a document (an app instance on the native side)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocId(SmartString);

impl DocId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(value: &str) -> Self {
        DocId(SmartString::from(value))
    }
}

impl From<String> for DocId {
    fn from(value: String) -> Self {
        DocId(SmartString::from(value))
    }
}

/// A virtual node tree and everything it needs to stay in sync with the
/// native renderer: node storage, the table of attached nodes, the optional
/// listener and the configuration.
///
/// Nodes start detached. A node is attached (registered, carries this
/// document's id) exactly when it is reachable from the document element.
pub struct Document {
    pub(crate) id: DocId,
    pub(crate) config: DocumentConfig,
    pub(crate) nodes: NodeArena,
    pub(crate) node_map: HashSet<NodeId>,
    pub(crate) listener: Option<Listener>,
    document_element: NodeId,
}

impl Document {
    pub fn new(id: impl Into<DocId>) -> Self {
        Self::with_config(id, DocumentConfig::default())
    }

    pub fn with_config(id: impl Into<DocId>, config: DocumentConfig) -> Self {
        let id = id.into();
        let mut nodes = NodeArena::new();
        let document_element = nodes.create(NodeData::Element(ElementData::new(
            SmartString::from(DOCUMENT_ELEMENT_TYPE),
            PropMap::new(),
            PropMap::new(),
        )));

        let mut doc = Self {
            id,
            config,
            nodes,
            node_map: HashSet::new(),
            listener: None,
            document_element,
        };
        doc.register_subtree(document_element);
        doc
    }

    pub fn id(&self) -> &DocId {
        &self.id
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Root of the attached tree
    pub fn document_element(&self) -> NodeId {
        self.document_element
    }

    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    pub fn create_element(&mut self, ty: impl Into<SmartString>) -> NodeId {
        self.create_element_with(ElementProps::new(ty))
    }

    pub fn create_element_with(&mut self, props: ElementProps) -> NodeId {
        let ty = props
            .ty
            .filter(|ty| !ty.is_empty())
            .unwrap_or_else(|| self.config.default_element_type.clone());
        self.nodes.create(NodeData::Element(ElementData::new(
            ty, props.attr, props.style,
        )))
    }

    pub fn create_comment(&mut self, value: impl Into<SmartString>) -> NodeId {
        self.nodes.create(NodeData::Comment(CommentData {
            value: value.into(),
        }))
    }

    /// Any live node, attached or not
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.nodes.get(id)?.as_element()
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id)?.as_element_mut()
    }

    /// Look up an attached node by the ref the native side knows it by
    pub fn get_ref(&self, reference: &str) -> Option<&Node> {
        let id = NodeId::from_ref(reference)?;
        if self.node_map.contains(&id) {
            self.nodes.get(id)
        } else {
            None
        }
    }

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.nodes.get(id).map(Node::node_type)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.parent(id)
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.links(id).prev
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.links(id).next
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.children(id)
    }

    pub fn pure_children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.pure_children(id)
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.node_map.contains(&id)
    }

    /// Number of nodes reachable from the document element
    pub fn attached_len(&self) -> usize {
        self.node_map.len()
    }

    /// Whether `pure_children(id)` is exactly the element subsequence of `children(id)`
    pub fn pure_children_consistent(&self, id: NodeId) -> bool {
        self.nodes
            .children(id)
            .iter()
            .copied()
            .filter(|&child| self.nodes.is_element(child))
            .eq(self.nodes.pure_children(id).iter().copied())
    }

    /// Bind the native side. Later commands go to this bridge; nothing sent
    /// before the bind is replayed.
    pub fn bind_bridge(&mut self, bridge: impl NativeBridge + 'static) {
        let mut listener = Listener::new(self.id.clone(), bridge);
        listener.set_batched(self.config.batched);
        self.set_listener(listener);
    }

    pub fn set_listener(&mut self, listener: Listener) {
        debug!(doc = %self.id, batched = listener.is_batched(), "listener bound");
        self.listener = Some(listener);
    }

    pub fn listener(&self) -> Option<&Listener> {
        self.listener.as_ref()
    }

    pub fn listener_mut(&mut self) -> Option<&mut Listener> {
        self.listener.as_mut()
    }

    pub fn flush(&mut self) -> Result<()> {
        match self.listener.as_mut() {
            Some(listener) => listener.flush(),
            None => Ok(()),
        }
    }

    pub fn create_finish(&mut self) -> Result<()> {
        match self.listener.as_mut() {
            Some(listener) => listener.create_finish(),
            None => Ok(()),
        }
    }

    pub fn update_finish(&mut self) -> Result<()> {
        match self.listener.as_mut() {
            Some(listener) => listener.update_finish(),
            None => Ok(()),
        }
    }

    /// Listener to notify about changes to `id`, if `id` is attached and one is bound
    pub(crate) fn listener_for(&mut self, id: NodeId) -> Option<&mut Listener> {
        if !self.node_map.contains(&id) {
            return None;
        }
        self.listener.as_mut()
    }

    pub(crate) fn will_notify(&self, id: NodeId) -> bool {
        self.listener.is_some() && self.node_map.contains(&id)
    }

    /// Destroy a node and its subtree. A node still under a parent is removed
    /// from it first, exactly as `remove_child(parent, id, false)` would.
    pub fn destroy(&mut self, id: NodeId) {
        if id == self.document_element {
            warn!(doc = %self.id, "refusing to destroy the document element");
            return;
        }
        match self.nodes.parent(id) {
            Some(parent) => self.remove_child(parent, id, false),
            None => self.destroy_subtree(id),
        }
    }

    /// Release `root` and every descendant. `root` must already be detached.
    pub(crate) fn destroy_subtree(&mut self, root: NodeId) {
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            stack.extend(self.nodes.take_children(id));
            self.node_map.remove(&id);
            if self.nodes.dispose(id).is_some() {
                debug!(doc = %self.id, node = %id, "node destroyed");
            }
        }
    }

    /// Attach `root` and its descendants to this document
    pub(crate) fn register_subtree(&mut self, root: NodeId) {
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            stack.extend(self.nodes.children(id).iter().copied());
            if let Some(node) = self.nodes.get_mut(id) {
                node.doc_id = Some(self.id.clone());
                self.node_map.insert(id);
            }
        }
    }

    /// Detach `root` and its descendants from the node table
    pub(crate) fn unregister_subtree(&mut self, root: NodeId) {
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            stack.extend(self.nodes.children(id).iter().copied());
            if let Some(node) = self.nodes.get_mut(id) {
                node.doc_id = None;
            }
            self.node_map.remove(&id);
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("nodes", &self.nodes.len())
            .field("attached", &self.node_map.len())
            .field("listener", &self.listener.is_some())
            .finish()
    }
}
