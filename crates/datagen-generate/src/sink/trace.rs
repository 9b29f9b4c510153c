use std::io::{self, Stdout, Write};

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use datagen_core::{Document, DocumentId};

use super::{OutputSink, SinkError};

#[derive(Serialize)]
struct TraceLine<'a> {
    collection: &'a str,
    id: &'a DocumentId,
    document: &'a Document,
}

/// Dry-run sink: prints each document as a JSON line and invents its id.
#[derive(Debug)]
pub struct TraceSink<W: Write + Send> {
    writer: W,
    ids: Option<ChaCha8Rng>,
    written: u64,
}

impl TraceSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TraceSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            ids: None,
            written: 0,
        }
    }

    /// Derive ids from a seed so repeated runs print identical output.
    pub fn with_id_seed(mut self, seed: u64) -> Self {
        self.ids = Some(ChaCha8Rng::seed_from_u64(seed));
        self
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn next_id(&mut self) -> DocumentId {
        let uuid = match self.ids.as_mut() {
            Some(rng) => uuid::Uuid::from_bytes(rng.random()),
            None => uuid::Uuid::new_v4(),
        };
        DocumentId::Opaque(uuid.simple().to_string())
    }
}

#[async_trait]
impl<W: Write + Send> OutputSink for TraceSink<W> {
    fn kind(&self) -> &'static str {
        "trace"
    }

    async fn clear(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    async fn write(
        &mut self,
        collection: &str,
        document: &Document,
    ) -> Result<DocumentId, SinkError> {
        let id = self.next_id();
        let line = TraceLine {
            collection,
            id: &id,
            document,
        };
        serde_json::to_writer(&mut self.writer, &line)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(id)
    }
}
