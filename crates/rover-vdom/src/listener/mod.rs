mod command;
mod json_lines;
mod recording;

pub use command::{Action, ChildIndex, Command};
pub use json_lines::JsonLinesBridge;
pub use recording::RecordingBridge;

use crate::document::DocId;
use crate::element::ElementJson;
use crate::error::Result;
use crate::node::NodeId;
use crate::value::{PropMap, PropValue};
use smartstring::alias::String as SmartString;
use tracing::{debug, error};

/// Native side of a document
///
/// Receives ordered batches of render-tree mutations. Implementations decide
/// the transport.
pub trait NativeBridge {
    fn call_native(&mut self, doc_id: &DocId, commands: &[Command]) -> Result<()>;
}

impl<F> NativeBridge for F
where
    F: FnMut(&DocId, &[Command]) -> Result<()>,
{
    fn call_native(&mut self, doc_id: &DocId, commands: &[Command]) -> Result<()> {
        self(doc_id, commands)
    }
}

/// Per-document command sink sitting in front of a [`NativeBridge`]
///
/// In immediate mode every command goes out as its own batch. In batched mode
/// commands queue up until [`Listener::flush`] or one of the finish markers.
pub struct Listener {
    doc_id: DocId,
    batched: bool,
    updates: Vec<Command>,
    bridge: Box<dyn NativeBridge>,
}

impl Listener {
    pub fn new(doc_id: DocId, bridge: impl NativeBridge + 'static) -> Self {
        Self {
            doc_id,
            batched: false,
            updates: Vec::new(),
            bridge: Box::new(bridge),
        }
    }

    pub fn doc_id(&self) -> &DocId {
        &self.doc_id
    }

    pub fn is_batched(&self) -> bool {
        self.batched
    }

    pub fn set_batched(&mut self, batched: bool) {
        self.batched = batched;
    }

    /// Commands queued in batched mode and not yet delivered
    pub fn pending(&self) -> &[Command] {
        &self.updates
    }

    pub fn add_element(&mut self, parent_ref: NodeId, element: ElementJson, index: ChildIndex) {
        self.add_action(Command::AddElement {
            parent_ref,
            element,
            index,
        });
    }

    pub fn move_element(&mut self, target_ref: NodeId, parent_ref: NodeId, index: usize) {
        self.add_action(Command::MoveElement {
            target_ref,
            parent_ref,
            index,
        });
    }

    pub fn remove_element(&mut self, target_ref: NodeId) {
        self.add_action(Command::RemoveElement { target_ref });
    }

    pub fn set_attr(&mut self, target_ref: NodeId, key: SmartString, value: PropValue) {
        self.add_action(Command::SetAttr {
            target_ref,
            key,
            value,
        });
    }

    pub fn set_style(&mut self, target_ref: NodeId, key: SmartString, value: PropValue) {
        self.add_action(Command::SetStyle {
            target_ref,
            key,
            value,
        });
    }

    pub fn set_styles(&mut self, target_ref: NodeId, style: PropMap) {
        self.add_action(Command::SetStyles { target_ref, style });
    }

    pub fn add_event(&mut self, target_ref: NodeId, event_type: SmartString) {
        self.add_action(Command::AddEvent {
            target_ref,
            event_type,
        });
    }

    pub fn remove_event(&mut self, target_ref: NodeId, event_type: SmartString) {
        self.add_action(Command::RemoveEvent {
            target_ref,
            event_type,
        });
    }

    /// Deliver everything queued so far as a single batch
    pub fn flush(&mut self) -> Result<()> {
        if self.updates.is_empty() {
            return Ok(());
        }
        let updates = std::mem::take(&mut self.updates);
        self.bridge.call_native(&self.doc_id, &updates)
    }

    /// Flush, then tell the native side the initial tree is complete
    pub fn create_finish(&mut self) -> Result<()> {
        self.flush()?;
        self.bridge
            .call_native(&self.doc_id, &[Command::CreateFinish])
    }

    /// Flush, then tell the native side an update pass is complete
    pub fn update_finish(&mut self) -> Result<()> {
        self.flush()?;
        self.bridge
            .call_native(&self.doc_id, &[Command::UpdateFinish])
    }

    fn add_action(&mut self, command: Command) {
        debug!(doc = %self.doc_id, method = command.method(), target = ?command.target(), "native command");

        if self.batched {
            self.updates.push(command);
            return;
        }

        if let Err(e) = self
            .bridge
            .call_native(&self.doc_id, std::slice::from_ref(&command))
        {
            error!("Native bridge rejected {} for document {}: {}", command.method(), self.doc_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn listener() -> (Listener, RecordingBridge) {
        let bridge = RecordingBridge::new();
        (Listener::new(DocId::from("doc"), bridge.clone()), bridge)
    }

    #[test]
    fn test_immediate_mode_sends_one_batch_per_command() {
        let (mut listener, bridge) = listener();
        listener.remove_element(NodeId(3));
        listener.add_event(NodeId(3), "click".into());

        assert_eq!(bridge.batches().len(), 2);
        assert_eq!(
            bridge.commands(),
            vec![
                Command::RemoveElement {
                    target_ref: NodeId(3)
                },
                Command::AddEvent {
                    target_ref: NodeId(3),
                    event_type: "click".into()
                },
            ]
        );
    }

    #[test]
    fn test_batched_mode_waits_for_flush() {
        let (mut listener, bridge) = listener();
        listener.set_batched(true);
        listener.remove_element(NodeId(1));
        listener.remove_element(NodeId(2));

        assert!(bridge.commands().is_empty());
        assert_eq!(listener.pending().len(), 2);

        listener.flush().unwrap();
        assert_eq!(bridge.batches().len(), 1);
        assert_eq!(bridge.batches()[0].len(), 2);
        assert!(listener.pending().is_empty());

        // Nothing queued, nothing sent
        listener.flush().unwrap();
        assert_eq!(bridge.batches().len(), 1);
    }

    #[test]
    fn test_finish_markers_follow_pending_updates() {
        let (mut listener, bridge) = listener();
        listener.set_batched(true);
        listener.remove_element(NodeId(1));
        listener.create_finish().unwrap();
        listener.update_finish().unwrap();

        assert_eq!(
            bridge.commands(),
            vec![
                Command::RemoveElement {
                    target_ref: NodeId(1)
                },
                Command::CreateFinish,
                Command::UpdateFinish,
            ]
        );
    }

    #[test]
    fn test_closure_bridge() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut listener = Listener::new(
            DocId::from("doc"),
            move |doc: &DocId, commands: &[Command]| -> Result<()> {
                sink.borrow_mut()
                    .extend(commands.iter().map(|c| format!("{doc}:{}", c.method())));
                Ok(())
            },
        );
        listener.move_element(NodeId(2), NodeId(1), 0);

        assert_eq!(*seen.borrow(), vec!["doc:moveElement".to_string()]);
    }

    #[test]
    fn test_bridge_failure_does_not_panic() {
        let (mut listener, bridge) = listener();
        bridge.close();
        listener.remove_element(NodeId(1));
        assert!(bridge.commands().is_empty());

        listener.set_batched(true);
        listener.remove_element(NodeId(2));
        assert!(listener.flush().is_err());
        assert!(listener.pending().is_empty());
    }
}
