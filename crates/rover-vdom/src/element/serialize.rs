use crate::document::Document;
use crate::error::Result;
use crate::node::NodeId;
use crate::value::PropMap;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use smartstring::alias::String as SmartString;
use std::fmt::Write as _;

/// Snapshot of an element subtree as the native side receives it.
/// Only element children are included.
///
/// Building and dropping a snapshot work at any depth. Serializing, cloning
/// and comparing recurse once per level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementJson {
    #[serde(rename = "ref")]
    pub node_ref: String,
    #[serde(rename = "type")]
    pub ty: SmartString,
    #[serde(default)]
    pub attr: PropMap,
    #[serde(default)]
    pub style: PropMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<SmartString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementJson>,
}

impl ElementJson {
    /// Parse a snapshot without serde_json's nesting limit, which a chain of
    /// about sixty elements already exceeds
    pub fn from_json_str(input: &str) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_str(input);
        de.disable_recursion_limit();
        let element = ElementJson::deserialize(&mut de)?;
        de.end()?;
        Ok(element)
    }
}

// Flatten the subtree so drop glue never recurses
impl Drop for ElementJson {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

enum HtmlStep {
    Open(NodeId),
    Close(NodeId),
}

impl Document {
    /// Snapshot `node` and its element descendants. `None` for comments and
    /// unknown ids.
    pub fn to_json(&self, node: NodeId) -> Option<ElementJson> {
        let mut stack: SmallVec<[(ElementJson, &[NodeId]); 8]> = SmallVec::new();
        stack.push((self.element_json(node)?, self.pure_children(node)));

        loop {
            let (_, pending) = stack.last_mut()?;
            let remaining: &[NodeId] = *pending;
            if let Some((&child, rest)) = remaining.split_first() {
                *pending = rest;
                if let Some(json) = self.element_json(child) {
                    stack.push((json, self.pure_children(child)));
                }
                continue;
            }

            // All children built: hand the finished element to its parent
            let (done, _) = stack.pop()?;
            match stack.last_mut() {
                Some((parent, _)) => parent.children.push(done),
                None => return Some(done),
            }
        }
    }

    fn element_json(&self, node: NodeId) -> Option<ElementJson> {
        let element = self.element(node)?;
        Some(ElementJson {
            node_ref: node.to_string(),
            ty: element.ty.clone(),
            attr: element.attr.clone(),
            style: element.to_style(),
            event: element.event_types().map(SmartString::from).collect(),
            children: Vec::new(),
        })
    }

    /// Debug markup for `node`: `<type attr={..} style={..}>children</type>`
    pub fn to_html(&self, node: NodeId) -> Option<String> {
        self.node(node)?;
        let mut out = String::new();
        let mut stack: SmallVec<[HtmlStep; 16]> = smallvec![HtmlStep::Open(node)];

        while let Some(step) = stack.pop() {
            match step {
                HtmlStep::Open(id) => {
                    let Some(current) = self.node(id) else {
                        continue;
                    };
                    if let Some(comment) = current.as_comment() {
                        write!(out, "<!-- {} -->", comment.value).ok()?;
                    } else if let Some(element) = current.as_element() {
                        // PropMap has string keys only, so these never fail
                        let attr = serde_json::to_string(&element.attr).unwrap_or_default();
                        let style = serde_json::to_string(&element.to_style()).unwrap_or_default();
                        write!(out, "<{} attr={} style={}>", element.ty, attr, style).ok()?;
                        stack.push(HtmlStep::Close(id));
                        stack.extend(
                            self.pure_children(id)
                                .iter()
                                .rev()
                                .map(|&child| HtmlStep::Open(child)),
                        );
                    }
                }
                HtmlStep::Close(id) => {
                    if let Some(element) = self.element(id) {
                        write!(out, "</{}>", element.ty).ok()?;
                    }
                }
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocId;
    use crate::element::ElementProps;
    use crate::listener::Command;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new("1");
        let list = doc.create_element_with(ElementProps::new("list").attr("id", "l"));
        let marker = doc.create_comment("for");
        let cell = doc.create_element_with(ElementProps::new("cell").style("height", 40));
        doc.append_child(list, marker);
        doc.append_child(list, cell);
        doc.add_event(cell, "click", |_, _, _| None);
        (doc, list)
    }

    #[test]
    fn test_to_json_skips_comments_and_empty_fields() {
        let (doc, list) = sample();
        let cell = doc.pure_children(list)[0];
        let value = serde_json::to_value(doc.to_json(list).unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "ref": list.to_string(),
                "type": "list",
                "attr": {"id": "l"},
                "style": {},
                "children": [{
                    "ref": cell.to_string(),
                    "type": "cell",
                    "attr": {},
                    "style": {"height": 40},
                    "event": ["click"],
                }],
            })
        );
    }

    #[test]
    fn test_snapshot_deserializes_back() {
        let (doc, list) = sample();
        let snapshot = doc.to_json(list).unwrap();
        let text = serde_json::to_string(&snapshot).unwrap();
        let parsed: ElementJson = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_comment_has_no_snapshot() {
        let (doc, list) = sample();
        let marker = doc.children(list)[0];
        assert!(doc.to_json(marker).is_none());
    }

    #[test]
    fn test_to_html() {
        let (doc, list) = sample();
        assert_eq!(
            doc.to_html(list).unwrap(),
            r#"<list attr={"id":"l"} style={}><cell attr={} style={"height":40}></cell></list>"#
        );
        let marker = doc.children(list)[0];
        assert_eq!(doc.to_html(marker).unwrap(), "<!-- for -->");
    }

    // Built bottom-up so each insertion sees a parentless parent
    fn chain(doc: &mut Document, depth: usize) -> (NodeId, NodeId) {
        let leaf = doc.create_element("leaf");
        let mut top = leaf;
        for _ in 1..depth {
            let parent = doc.create_element("box");
            doc.append_child(parent, top);
            top = parent;
        }
        (top, leaf)
    }

    fn depth_of(element: &ElementJson) -> usize {
        let mut depth = 1;
        let mut cursor = element;
        while let Some(child) = cursor.children.first() {
            depth += 1;
            cursor = child;
        }
        depth
    }

    #[test]
    fn test_attaching_a_deep_chain_announces_it_whole() {
        const DEPTH: usize = 100_000;
        let mut doc = Document::new("1");
        let announced = Rc::new(Cell::new(0));
        let seen = announced.clone();
        doc.bind_bridge(move |_: &DocId, commands: &[Command]| -> Result<()> {
            for command in commands {
                if let Command::AddElement { element, .. } = command {
                    seen.set(depth_of(element));
                }
            }
            Ok(())
        });

        let (top, leaf) = chain(&mut doc, DEPTH);
        let root = doc.document_element();
        doc.append_child(root, top);

        assert_eq!(announced.get(), DEPTH);
        assert!(doc.is_attached(leaf));

        let html = doc.to_html(top).unwrap();
        assert!(html.starts_with("<box attr={} style={}><box"));
        assert!(html.ends_with("</leaf></box></box>"));
        assert_eq!(html.matches("</box>").count(), DEPTH - 1);
    }

    #[test]
    fn test_deep_snapshot_rehydrates() {
        let mut doc = Document::new("1");
        let (top, _) = chain(&mut doc, 100);
        let snapshot = doc.to_json(top).unwrap();
        let text = serde_json::to_string(&snapshot).unwrap();

        assert!(serde_json::from_str::<ElementJson>(&text).is_err());
        let parsed = ElementJson::from_json_str(&text).unwrap();
        assert_eq!(depth_of(&parsed), 100);
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_from_json_str_rejects_trailing_input() {
        let err = ElementJson::from_json_str(r#"{"ref":"1","type":"div"} x"#).unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }
}
