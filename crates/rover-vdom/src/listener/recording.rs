use super::{Command, NativeBridge};
use crate::document::DocId;
use crate::error::{Error, Result};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Bridge that records every batch it receives
///
/// Cloning shares the log, so a test can keep one handle and give the other to
/// a [`Listener`](super::Listener).
#[derive(Clone, Default)]
pub struct RecordingBridge {
    batches: Rc<RefCell<Vec<Vec<Command>>>>,
    closed: Rc<Cell<bool>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// All received commands, flattened in delivery order
    pub fn commands(&self) -> Vec<Command> {
        self.batches.borrow().iter().flatten().cloned().collect()
    }

    pub fn batches(&self) -> Vec<Vec<Command>> {
        self.batches.borrow().clone()
    }

    /// Drain the log, returning the flattened commands
    pub fn take_commands(&self) -> Vec<Command> {
        let batches = std::mem::take(&mut *self.batches.borrow_mut());
        batches.into_iter().flatten().collect()
    }

    pub fn clear(&self) {
        self.batches.borrow_mut().clear();
    }

    /// Refuse every later delivery with [`Error::BridgeClosed`]
    pub fn close(&self) {
        self.closed.set(true);
    }
}

impl NativeBridge for RecordingBridge {
    fn call_native(&mut self, doc_id: &DocId, commands: &[Command]) -> Result<()> {
        if self.closed.get() {
            return Err(Error::BridgeClosed(doc_id.clone()));
        }
        self.batches.borrow_mut().push(commands.to_vec());
        Ok(())
    }
}
