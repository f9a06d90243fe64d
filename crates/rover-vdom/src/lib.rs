//! Virtual node tree that mirrors itself to a native renderer.
//!
//! A [`Document`] owns its nodes. Every mutation of the attached part of the
//! tree is translated into [`Command`]s and handed to the document's
//! [`Listener`], which forwards them to a [`NativeBridge`]. Native renderers
//! only ever see elements: comments keep their place in the logical tree but
//! are skipped when computing native indices.

pub mod arena;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod listener;
pub mod node;
pub mod registry;
mod sibling;
pub mod value;

pub use arena::NodeArena;
pub use config::DocumentConfig;
pub use document::{DocId, Document};
pub use element::{DomChanges, ElementData, ElementJson, ElementProps, EventHandler, Notify};
pub use error::{Error, Result};
pub use listener::{ChildIndex, Command, JsonLinesBridge, Listener, NativeBridge, RecordingBridge};
pub use node::{Node, NodeId, NodeType};
pub use registry::DocumentRegistry;
pub use value::{PropMap, PropValue};
