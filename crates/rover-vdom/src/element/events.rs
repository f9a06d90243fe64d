use super::Notify;
use crate::document::Document;
use crate::node::NodeId;
use crate::value::PropMap;
use serde::Deserialize;
use serde_json::Value;
use smartstring::alias::String as SmartString;
use std::rc::Rc;
use tracing::{debug, warn};

/// Callback bound to an element event. Receives the document, the element
/// and the event payload.
pub type EventHandler = Rc<dyn Fn(&mut Document, NodeId, &Value) -> Option<Value>>;

/// State the native view already reflects when it raises an event
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DomChanges {
    pub attrs: PropMap,
    pub style: PropMap,
}

impl Document {
    /// Register `handler` for `event_type`. The first handler for a type wins.
    pub fn add_event(
        &mut self,
        node: NodeId,
        event_type: impl Into<SmartString>,
        handler: impl Fn(&mut Document, NodeId, &Value) -> Option<Value> + 'static,
    ) {
        let event_type = event_type.into();
        let Some(element) = self.element_mut(node) else {
            warn!(node = %node, event = %event_type, "add_event: not a live element");
            return;
        };
        if element.events.contains_key(&event_type) {
            debug!(node = %node, event = %event_type, "handler already registered");
            return;
        }
        element
            .events
            .insert(event_type.clone(), Rc::new(handler) as EventHandler);

        if let Some(listener) = self.listener_for(node) {
            listener.add_event(node, event_type);
        }
    }

    pub fn remove_event(&mut self, node: NodeId, event_type: &str) {
        let Some(element) = self.element_mut(node) else {
            warn!(node = %node, event = event_type, "remove_event: not a live element");
            return;
        };
        if element.events.remove(event_type).is_none() {
            return;
        }

        if let Some(listener) = self.listener_for(node) {
            listener.remove_event(node, SmartString::from(event_type));
        }
    }

    /// Run the handler registered for `event_type`, returning what it returns
    pub fn fire_event(&mut self, node: NodeId, event_type: &str, arg: &Value) -> Option<Value> {
        let handler = self.element(node)?.events.get(event_type).cloned()?;
        debug!(node = %node, event = event_type, "firing event");
        handler(self, node, arg)
    }

    /// Apply what the native view reports, silently, then fire
    pub fn fire_event_with(
        &mut self,
        node: NodeId,
        event_type: &str,
        arg: &Value,
        changes: &DomChanges,
    ) -> Option<Value> {
        for (key, value) in &changes.attrs {
            self.set_attr_with(node, key.clone(), value.clone(), Notify::Silent);
        }
        for (key, value) in &changes.style {
            self.set_style_with(node, key.clone(), value.clone(), Notify::Silent);
        }
        self.fire_event(node, event_type, arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::{Command, RecordingBridge};
    use crate::PropValue;
    use serde_json::json;
    use std::cell::Cell;

    fn attached(doc: &mut Document) -> NodeId {
        let node = doc.create_element("input");
        let root = doc.document_element();
        doc.append_child(root, node);
        node
    }

    #[test]
    fn test_first_handler_wins() {
        let mut doc = Document::new("1");
        let bridge = RecordingBridge::new();
        doc.bind_bridge(bridge.clone());
        let node = attached(&mut doc);
        bridge.clear();

        doc.add_event(node, "click", |_, _, _| Some(json!("first")));
        doc.add_event(node, "click", |_, _, _| Some(json!("second")));

        assert_eq!(
            bridge.take_commands(),
            vec![Command::AddEvent {
                target_ref: node,
                event_type: "click".into()
            }]
        );
        assert_eq!(doc.fire_event(node, "click", &Value::Null), Some(json!("first")));
    }

    #[test]
    fn test_remove_event() {
        let mut doc = Document::new("1");
        let bridge = RecordingBridge::new();
        doc.bind_bridge(bridge.clone());
        let node = attached(&mut doc);
        doc.add_event(node, "change", |_, _, _| None);
        bridge.clear();

        doc.remove_event(node, "change");
        doc.remove_event(node, "change");
        assert_eq!(
            bridge.take_commands(),
            vec![Command::RemoveEvent {
                target_ref: node,
                event_type: "change".into()
            }]
        );
        assert!(!doc.element(node).unwrap().has_event("change"));
        assert_eq!(doc.fire_event(node, "change", &Value::Null), None);
    }

    #[test]
    fn test_handler_can_mutate_the_document() {
        let mut doc = Document::new("1");
        let node = attached(&mut doc);
        doc.add_event(node, "click", |doc, target, arg| {
            doc.set_attr(target, "clicked", arg["times"].as_i64().unwrap_or(0));
            let child = doc.create_element("badge");
            doc.append_child(target, child);
            Some(json!(child.to_string()))
        });

        let result = doc.fire_event(node, "click", &json!({"times": 3}));
        assert!(result.is_some());
        assert_eq!(doc.children(node).len(), 1);
        assert_eq!(
            doc.element(node).and_then(|e| e.attr().get("clicked")),
            Some(&PropValue::Int(3))
        );
    }

    #[test]
    fn test_fire_event_with_applies_changes_silently() {
        let mut doc = Document::new("1");
        let bridge = RecordingBridge::new();
        doc.bind_bridge(bridge.clone());
        let node = attached(&mut doc);
        let seen = Rc::new(Cell::new(false));
        let flag = seen.clone();
        doc.add_event(node, "input", move |doc, target, _| {
            let value = doc.element(target)?.attr().get("value")?.as_str()?.to_string();
            flag.set(value == "hello");
            None
        });
        bridge.clear();

        let changes: DomChanges =
            serde_json::from_value(json!({"attrs": {"value": "hello"}, "style": {"height": 20}}))
                .unwrap();
        doc.fire_event_with(node, "input", &Value::Null, &changes);

        assert!(seen.get());
        assert!(bridge.commands().is_empty());
        assert_eq!(
            doc.element(node).and_then(|e| e.style().get("height")),
            Some(&PropValue::Int(20))
        );
    }

    #[test]
    fn test_missing_handler_returns_none() {
        let mut doc = Document::new("1");
        let node = doc.create_element("div");
        let marker = doc.create_comment("m");
        assert_eq!(doc.fire_event(node, "click", &Value::Null), None);
        assert_eq!(doc.fire_event(marker, "click", &Value::Null), None);
    }
}
