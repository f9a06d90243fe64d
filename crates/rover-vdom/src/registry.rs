use crate::config::DocumentConfig;
use crate::document::{DocId, Document};
use crate::error::{Error, Result};
use crate::listener::Listener;
use std::collections::HashMap;
use tracing::info;

/// All live documents, by id
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    docs: HashMap<DocId, Document>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_document(
        &mut self,
        id: impl Into<DocId>,
        config: DocumentConfig,
    ) -> Result<&mut Document> {
        let id = id.into();
        if self.docs.contains_key(&id) {
            return Err(Error::DuplicateDocument(id));
        }
        info!(doc = %id, "document created");
        let doc = Document::with_config(id.clone(), config);
        Ok(self.docs.entry(id).or_insert(doc))
    }

    pub fn get_doc(&self, id: &str) -> Option<&Document> {
        self.docs.get(&DocId::from(id))
    }

    pub fn get_doc_mut(&mut self, id: &str) -> Option<&mut Document> {
        self.docs.get_mut(&DocId::from(id))
    }

    /// Listener bound to a document, if both exist
    pub fn get_listener(&mut self, id: &str) -> Option<&mut Listener> {
        self.get_doc_mut(id)?.listener_mut()
    }

    /// Remove a document. Pending batched commands are flushed first; a
    /// delivery failure is logged and the document is still removed.
    pub fn destroy_document(&mut self, id: &str) -> Result<Document> {
        let mut doc = self
            .docs
            .remove(&DocId::from(id))
            .ok_or_else(|| Error::UnknownDocument(DocId::from(id)))?;
        if let Err(e) = doc.flush() {
            tracing::error!("Failed to flush document {} on destroy: {}", id, e);
        }
        info!(doc = %id, "document destroyed");
        Ok(doc)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &DocId> {
        self.docs.keys()
    }
}
