use crate::document::DocId;
use crate::element::ElementData;
use smartstring::alias::String as SmartString;
use std::fmt;

/// Unique identifier of a node inside its document. Doubles as the node's
/// `ref` on the native side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    // usize is at most 64 bits wide on every target, so this never truncates
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index as u64)
    }

    /// Parse a ref string coming back from the native side
    pub fn from_ref(reference: &str) -> Option<Self> {
        reference.parse().ok().map(NodeId)
    }

    pub fn index(self) -> usize {
        // Out-of-range refs map past the end of the arena and resolve to nothing
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Node kind discriminator, numbered like the DOM's `nodeType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Comment = 8,
}

/// Comment node payload
#[derive(Debug, Clone, PartialEq)]
pub struct CommentData {
    pub value: SmartString,
}

pub enum NodeData {
    Element(ElementData),
    Comment(CommentData),
}

/// A node stored in the document arena. Tree links (parent and siblings)
/// live next to it in the arena, not here.
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) doc_id: Option<DocId>,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(id: NodeId, data: NodeData) -> Self {
        Self {
            id,
            doc_id: None,
            data,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Owning document, set while the node is reachable from the document element
    pub fn doc_id(&self) -> Option<&DocId> {
        self.doc_id.as_ref()
    }

    pub fn node_type(&self) -> NodeType {
        match self.data {
            NodeData::Element(_) => NodeType::Element,
            NodeData::Comment(_) => NodeType::Comment,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_comment(&self) -> Option<&CommentData> {
        match &self.data {
            NodeData::Comment(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_round_trip() {
        let id = NodeId(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(NodeId::from_ref("42"), Some(id));
        assert_eq!(NodeId::from_ref("_root"), None);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_ids_past_u32_stay_distinct() {
        let past = NodeId::from_index(1 << 32);
        assert_ne!(past, NodeId::from_index(0));
        assert_eq!(past.index(), 1 << 32);
        assert_eq!(past.to_string(), "4294967296");
        assert_eq!(NodeId::from_ref("4294967296"), Some(past));
    }

    #[test]
    fn test_huge_ref_resolves_to_nothing() {
        let mut doc = crate::Document::new("1");
        let id = NodeId::from_ref(&u64::MAX.to_string()).unwrap();
        assert!(doc.node(id).is_none());
        assert!(doc.get_ref(&u64::MAX.to_string()).is_none());

        // Stale or forged ids are ignored by the tree API
        let root = doc.document_element();
        doc.append_child(root, id);
        assert!(doc.children(root).is_empty());
    }

    #[test]
    fn test_node_type_discriminants() {
        assert_eq!(NodeType::Element as u8, 1);
        assert_eq!(NodeType::Comment as u8, 8);

        let comment = Node::new(
            NodeId(0),
            NodeData::Comment(CommentData {
                value: "marker".into(),
            }),
        );
        assert_eq!(comment.node_type(), NodeType::Comment);
        assert!(!comment.is_element());
        assert!(comment.as_element().is_none());
        assert!(comment.doc_id().is_none());
    }
}
