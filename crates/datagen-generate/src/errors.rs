use thiserror::Error;

use datagen_template::TemplateError;

use crate::sink::SinkError;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("{kind} dictionary file '{path}' does not exist or could not be opened: {source}")]
    Dictionary {
        kind: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{kind} dictionary file '{path}' is malformed: {message}")]
    DictionaryFormat {
        kind: &'static str,
        path: String,
        message: String,
    },
    #[error(transparent)]
    Encoding(#[from] datagen_core::Error),
    #[error("output error: {0}")]
    Sink(#[from] SinkError),
}
