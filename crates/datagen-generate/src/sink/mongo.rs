use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, doc};
use mongodb::{Client, Database};
use tracing::{debug, info};

use datagen_core::{Document, DocumentId, FieldValue, Reference};

use super::{OutputSink, SinkError};

/// Sink writing every document to a MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoSink {
    database: Database,
}

impl MongoSink {
    /// Connect to `mongodb://<hostname>:<port>` and check the server answers.
    pub async fn connect(hostname: &str, port: u16, dbname: &str) -> Result<Self, SinkError> {
        let target = format!("mongodb://{hostname}:{port}");
        let client = Client::with_uri_str(&target)
            .await
            .map_err(|source| SinkError::Connect {
                target: target.clone(),
                source,
            })?;
        let database = client.database(dbname);

        database
            .list_collection_names()
            .await
            .map_err(|source| SinkError::Connect {
                target: target.clone(),
                source,
            })?;

        info!(event = "store_connected", target = %target, database = %dbname);

        Ok(Self { database })
    }

    /// Wrap an existing database handle.
    pub fn with_database(database: Database) -> Self {
        Self { database }
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }
}

#[async_trait]
impl OutputSink for MongoSink {
    fn kind(&self) -> &'static str {
        "mongodb"
    }

    async fn clear(&mut self) -> Result<(), SinkError> {
        info!(event = "database_dropped", database = %self.database.name());
        self.database.drop().await?;
        Ok(())
    }

    async fn write(
        &mut self,
        collection: &str,
        document: &Document,
    ) -> Result<DocumentId, SinkError> {
        let bson_document = to_bson_document(document)?;
        let result = self
            .database
            .collection::<bson::Document>(collection)
            .insert_one(bson_document)
            .await?;
        let id = document_id_from_bson(result.inserted_id);
        debug!(collection = %collection, id = %id, "document inserted");
        Ok(id)
    }
}

/// Convert a generated document to BSON, keeping field order.
pub fn to_bson_document(document: &Document) -> Result<bson::Document, SinkError> {
    let mut output = bson::Document::new();
    for (name, value) in document.iter() {
        output.insert(name, field_to_bson(value)?);
    }
    Ok(output)
}

fn field_to_bson(value: &FieldValue) -> Result<Bson, SinkError> {
    match value {
        FieldValue::Text(text) => Ok(Bson::String(text.clone())),
        FieldValue::List(items) => Ok(Bson::Array(
            items.iter().cloned().map(Bson::String).collect(),
        )),
        FieldValue::Reference(reference) => reference_to_bson(reference),
    }
}

/// References are stored as DBRef sub-documents.
fn reference_to_bson(reference: &Reference) -> Result<Bson, SinkError> {
    let id = match &reference.id {
        DocumentId::ObjectId(hex) => ObjectId::parse_str(hex)
            .map(Bson::ObjectId)
            .map_err(|err| SinkError::InvalidId(format!("{hex}: {err}")))?,
        DocumentId::Opaque(value) => Bson::String(value.clone()),
    };
    Ok(Bson::Document(doc! {
        "$ref": reference.collection.as_str(),
        "$id": id,
        "$db": reference.database.as_str(),
    }))
}

fn document_id_from_bson(value: Bson) -> DocumentId {
    match value {
        Bson::ObjectId(oid) => DocumentId::ObjectId(oid.to_hex()),
        Bson::String(value) => DocumentId::Opaque(value),
        other => DocumentId::Opaque(other.to_string()),
    }
}
