//! Template contracts and validation for datagen.
//!
//! A template is an ordered JSON list of collection definitions. This crate
//! parses it, checks it against the JSON Schema derived from the model, and
//! runs the semantic checks (known generators, declaration order of
//! referenced collections, size ranges) before any document is generated.

pub mod errors;
pub mod model;
pub mod sample;
pub mod schema;
pub mod validate;

pub use errors::{IssueSeverity, Result, TemplateError, ValidationIssue, ValidationReport};
pub use model::{CollectionDef, FieldDef, NameField, SizeSpec, Template};
pub use sample::SAMPLE_TEMPLATE;
pub use schema::template_json_schema;
pub use validate::{
    ValidatedTemplate, load_template, parse_template, validate_template, validate_template_json,
};
