use super::{Action, Command, NativeBridge};
use crate::document::DocId;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct Batch<'a> {
    doc: &'a DocId,
    actions: Vec<Action>,
}

/// Bridge that writes each batch as one line of JSON
///
/// Line shape: `{"doc":"<id>","actions":[{"module":"dom","method":..,"args":[..]}]}`
pub struct JsonLinesBridge<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesBridge<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> NativeBridge for JsonLinesBridge<W> {
    fn call_native(&mut self, doc_id: &DocId, commands: &[Command]) -> Result<()> {
        let batch = Batch {
            doc: doc_id,
            actions: commands.iter().map(Command::to_action).collect(),
        };
        serde_json::to_writer(&mut self.writer, &batch)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
