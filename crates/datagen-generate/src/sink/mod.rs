use async_trait::async_trait;
use thiserror::Error;

use datagen_core::{Document, DocumentId};

pub mod mongo;
pub mod trace;

pub use mongo::MongoSink;
pub use trace::TraceSink;

/// Errors raised by output sinks.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to connect to MongoDB instance at {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid document id: {0}")]
    InvalidId(String),
}

/// Destination for generated documents.
#[async_trait]
pub trait OutputSink: Send {
    /// Short identifier used in logs and reports (e.g. `mongodb`).
    fn kind(&self) -> &'static str;

    /// Remove all data previously written to the sink's namespace.
    async fn clear(&mut self) -> Result<(), SinkError>;

    /// Persist one document and return its identifier.
    async fn write(
        &mut self,
        collection: &str,
        document: &Document,
    ) -> Result<DocumentId, SinkError>;
}
