//! Template-driven document generation for datagen.
//!
//! This crate loads the sampling dictionaries, shapes sampled tokens with the
//! grammar transforms, and drives a run that writes every generated document
//! to an [`OutputSink`](sink::OutputSink) in template order.

pub mod assets;
pub mod dictionary;
pub mod engine;
pub mod errors;
pub mod grammar;
pub mod model;
pub mod progress;
pub mod registry;
pub mod sink;

pub use dictionary::{Dictionary, DictionarySet, SampleOptions};
pub use engine::Generator;
pub use errors::GenerationError;
pub use grammar::Grammar;
pub use model::{CollectionReport, GenerateOptions, GenerationReport, GrammarOptions};
pub use progress::{NoProgress, ProgressReporter};
pub use registry::IdRegistry;
pub use sink::{MongoSink, OutputSink, SinkError, TraceSink};
