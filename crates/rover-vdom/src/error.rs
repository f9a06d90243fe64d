use crate::document::DocId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Document '{0}' is not registered")]
    UnknownDocument(DocId),

    #[error("Document '{0}' is already registered")]
    DuplicateDocument(DocId),

    #[error("Native bridge for document '{0}' is closed")]
    BridgeClosed(DocId),

    #[error("Bridge I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
