use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use datagen_core::TextEncoding;

use crate::errors::GenerationError;

/// Shaping parameters for the sentence and body grammars.
///
/// Every randomized length is drawn from `[mean - jitter, mean + jitter)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarOptions {
    /// Mean number of words between commas.
    pub comma_freq: u32,
    /// Mean number of words between semicolons.
    pub semicolon_freq: u32,
    /// Mean number of words per sentence.
    pub sentence_len: u32,
    /// Mean number of sentences per paragraph.
    pub para_len: u32,
    pub jitter: u32,
}

impl Default for GrammarOptions {
    fn default() -> Self {
        Self {
            comma_freq: 7,
            semicolon_freq: 15,
            sentence_len: 10,
            para_len: 5,
            jitter: 2,
        }
    }
}

impl GrammarOptions {
    pub fn validate(&self) -> Result<(), GenerationError> {
        let means = [
            ("comma_freq", self.comma_freq),
            ("semicolon_freq", self.semicolon_freq),
            ("sentence_len", self.sentence_len),
            ("para_len", self.para_len),
        ];
        for (key, mean) in means {
            if mean <= self.jitter {
                return Err(GenerationError::InvalidOptions(format!(
                    "grammar.{key} ({mean}) must be greater than grammar.jitter ({})",
                    self.jitter
                )));
            }
        }
        Ok(())
    }
}

/// Options for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Encoding applied to every generated text value.
    pub encoding: TextEncoding,
    /// Keep existing data instead of clearing the sink first.
    pub preserve_database: bool,
    /// Database name recorded in references.
    pub database: String,
    /// Seed for the run's random source; a random seed is drawn when absent.
    pub seed: Option<u64>,
    pub grammar: GrammarOptions,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Utf8,
            preserve_database: false,
            database: "datagen".to_string(),
            seed: None,
            grammar: GrammarOptions::default(),
        }
    }
}

/// Summary of a generated collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionReport {
    pub collection: String,
    pub documents_requested: u64,
    pub documents_written: u64,
    pub references_resolved: u64,
    pub fields_omitted: u64,
    pub duration_ms: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub started_at: String,
    pub sink: String,
    pub encoding: TextEncoding,
    pub cleared: bool,
    pub collections: Vec<CollectionReport>,
    pub documents_total: u64,
    pub generator_usage: BTreeMap<String, u64>,
    pub grammar_usage: BTreeMap<String, u64>,
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64, sink: &str, encoding: TextEncoding) -> Self {
        Self {
            run_id,
            seed,
            started_at: chrono::Utc::now().to_rfc3339(),
            sink: sink.to_string(),
            encoding,
            cleared: false,
            collections: Vec::new(),
            documents_total: 0,
            generator_usage: BTreeMap::new(),
            grammar_usage: BTreeMap::new(),
            warnings: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record_generator_usage(&mut self, id: &str) {
        *self.generator_usage.entry(id.to_string()).or_insert(0) += 1;
    }

    pub fn record_grammar_usage(&mut self, id: &str) {
        *self.grammar_usage.entry(id.to_string()).or_insert(0) += 1;
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionReport> {
        self.collections
            .iter()
            .find(|report| report.collection == name)
    }
}
