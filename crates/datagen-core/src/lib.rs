//! Core contracts shared across datagen crates.
//!
//! This crate defines the generated document model, the references that link
//! documents across collections, and the text encodings applied to every
//! generated value before it reaches an output sink.

pub mod document;
pub mod encoding;
pub mod error;

pub use document::{Document, DocumentId, FieldValue, Reference};
pub use encoding::TextEncoding;
pub use error::{Error, Result};

/// Prefix marking a field type as a cross-collection reference (`ref:<collection>`).
pub const REFERENCE_PREFIX: &str = "ref:";
