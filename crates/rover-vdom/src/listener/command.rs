use crate::element::ElementJson;
use crate::node::NodeId;
use crate::value::{PropMap, PropValue};
use serde::Serialize;
use serde_json::{json, Value};
use smartstring::alias::String as SmartString;

/// Where a new element lands among its parent's element children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildIndex {
    /// After the last element child (`-1` on the wire)
    Append,
    At(usize),
}

impl ChildIndex {
    pub fn to_wire(self) -> i64 {
        match self {
            ChildIndex::Append => -1,
            ChildIndex::At(index) => index as i64,
        }
    }
}

/// A mutation of the native render tree
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddElement {
        parent_ref: NodeId,
        element: ElementJson,
        index: ChildIndex,
    },
    MoveElement {
        target_ref: NodeId,
        parent_ref: NodeId,
        index: usize,
    },
    RemoveElement {
        target_ref: NodeId,
    },
    SetAttr {
        target_ref: NodeId,
        key: SmartString,
        value: PropValue,
    },
    SetStyle {
        target_ref: NodeId,
        key: SmartString,
        value: PropValue,
    },
    SetStyles {
        target_ref: NodeId,
        style: PropMap,
    },
    AddEvent {
        target_ref: NodeId,
        event_type: SmartString,
    },
    RemoveEvent {
        target_ref: NodeId,
        event_type: SmartString,
    },
    CreateFinish,
    UpdateFinish,
}

/// Wire form of a command: `{"module":"dom","method":..,"args":[..]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub module: &'static str,
    pub method: &'static str,
    pub args: Vec<Value>,
}

impl Command {
    /// Method name used on the wire
    pub fn method(&self) -> &'static str {
        match self {
            Command::AddElement { .. } => "addElement",
            Command::MoveElement { .. } => "moveElement",
            Command::RemoveElement { .. } => "removeElement",
            Command::SetAttr { .. } => "updateAttrs",
            Command::SetStyle { .. } | Command::SetStyles { .. } => "updateStyle",
            Command::AddEvent { .. } => "addEvent",
            Command::RemoveEvent { .. } => "removeEvent",
            Command::CreateFinish => "createFinish",
            Command::UpdateFinish => "updateFinish",
        }
    }

    /// Ref of the node the command acts on, if any
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Command::AddElement { parent_ref, .. } => Some(*parent_ref),
            Command::MoveElement { target_ref, .. }
            | Command::RemoveElement { target_ref }
            | Command::SetAttr { target_ref, .. }
            | Command::SetStyle { target_ref, .. }
            | Command::SetStyles { target_ref, .. }
            | Command::AddEvent { target_ref, .. }
            | Command::RemoveEvent { target_ref, .. } => Some(*target_ref),
            Command::CreateFinish | Command::UpdateFinish => None,
        }
    }

    pub fn to_action(&self) -> Action {
        let args = match self {
            Command::AddElement {
                parent_ref,
                element,
                index,
            } => vec![
                json!(parent_ref.to_string()),
                json!(element),
                json!(index.to_wire()),
            ],
            Command::MoveElement {
                target_ref,
                parent_ref,
                index,
            } => vec![
                json!(target_ref.to_string()),
                json!(parent_ref.to_string()),
                json!(index),
            ],
            Command::RemoveElement { target_ref } => vec![json!(target_ref.to_string())],
            Command::SetAttr {
                target_ref,
                key,
                value,
            }
            | Command::SetStyle {
                target_ref,
                key,
                value,
            } => {
                let mut entry = serde_json::Map::new();
                entry.insert(key.to_string(), json!(value));
                vec![json!(target_ref.to_string()), Value::Object(entry)]
            }
            Command::SetStyles { target_ref, style } => {
                vec![json!(target_ref.to_string()), json!(style)]
            }
            Command::AddEvent {
                target_ref,
                event_type,
            }
            | Command::RemoveEvent {
                target_ref,
                event_type,
            } => vec![json!(target_ref.to_string()), json!(event_type.as_str())],
            Command::CreateFinish | Command::UpdateFinish => Vec::new(),
        };

        Action {
            module: "dom",
            method: self.method(),
            args,
        }
    }
}
