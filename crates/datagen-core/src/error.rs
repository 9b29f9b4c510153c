use thiserror::Error;

/// Core error type shared across datagen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A value could not be represented in the requested output encoding.
    #[error("{mode} encoding failed: {message}")]
    Encoding { mode: &'static str, message: String },
    /// A document identifier could not be interpreted by the store.
    #[error("invalid document id: {0}")]
    InvalidId(String),
}

/// Convenience alias for results returned by datagen crates.
pub type Result<T> = std::result::Result<T, Error>;
