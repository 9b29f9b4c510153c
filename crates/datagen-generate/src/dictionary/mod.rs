use std::collections::BTreeMap;
use std::fmt;

use rand::{Rng, RngCore};
use tracing::info;

use datagen_template::SizeSpec;

use crate::assets::{AssetSource, LOREM_FILE, NAMES_FILE, WORDS_FILE};
use crate::errors::GenerationError;

pub mod lipsum;
pub mod names;
pub mod numbers;
pub mod words;

pub use lipsum::LipsumDictionary;
pub use names::{NameRecord, NamesDictionary};
pub use numbers::NumbersDictionary;
pub use words::WordsDictionary;

/// Per-field options forwarded to a dictionary sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleOptions<'a> {
    /// The field's `type`; the numbers dictionary reads it as a pattern key.
    pub field_type: Option<&'a str>,
    /// Projection for the names dictionary.
    pub subfield: Option<&'a str>,
}

/// A loaded data source that produces random samples.
pub trait Dictionary: Send + Sync + fmt::Debug {
    fn id(&self) -> &'static str;

    /// Number of entries loaded from the source.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Output is already final text and must skip grammar transforms.
    fn is_formatted(&self) -> bool {
        false
    }

    /// Draw `count` items.
    fn sample(
        &self,
        count: usize,
        options: &SampleOptions<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<String>, GenerationError>;

    /// Resolve a template size, then sample.
    fn sample_sized(
        &self,
        size: Option<&SizeSpec>,
        options: &SampleOptions<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<String>, GenerationError> {
        let count = resolve_size(size, rng)?;
        self.sample(count, options, rng)
    }
}

/// A fixed size is used as-is; a `[low, high)` range draws one integer uniformly.
pub fn resolve_size(size: Option<&SizeSpec>, rng: &mut dyn RngCore) -> Result<usize, GenerationError> {
    let value = match size {
        None => 0,
        Some(SizeSpec::Fixed(value)) => *value,
        Some(SizeSpec::Range(low, high)) => {
            if low >= high {
                return Err(GenerationError::InvalidTemplate(format!(
                    "malformed size [{low}, {high}): low must be below high"
                )));
            }
            rng.random_range(*low..*high)
        }
    };
    usize::try_from(value)
        .map_err(|_| GenerationError::InvalidTemplate(format!("size {value} is too large")))
}

/// Uniform draws with replacement from a flat word list.
pub(crate) fn sample_words(
    id: &str,
    words: &[String],
    count: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<String>, GenerationError> {
    if count > 0 && words.is_empty() {
        return Err(GenerationError::InvalidTemplate(format!(
            "dictionary '{id}' has no entries to sample"
        )));
    }
    Ok((0..count)
        .map(|_| words[rng.random_range(0..words.len())].clone())
        .collect())
}

/// Dictionaries available to a run, keyed by generator id.
#[derive(Debug, Default)]
pub struct DictionarySet {
    dictionaries: BTreeMap<&'static str, Box<dyn Dictionary>>,
}

impl DictionarySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the standard dictionaries from an asset directory.
    pub fn load(assets: &AssetSource) -> Result<Self, GenerationError> {
        info!(event = "dictionaries_loading", root = %assets.root().display());

        let mut set = Self::new();
        set.register(Box::new(NamesDictionary::load(&assets.path(NAMES_FILE))?));
        set.register(Box::new(WordsDictionary::load(&assets.path(WORDS_FILE))?));
        set.register(Box::new(LipsumDictionary::load(&assets.path(LOREM_FILE))?));
        set.register(Box::new(NumbersDictionary::new()));

        for dictionary in set.dictionaries.values() {
            info!(
                event = "dictionary_loaded",
                dictionary = dictionary.id(),
                entries = dictionary.len()
            );
        }

        Ok(set)
    }

    pub fn register(&mut self, dictionary: Box<dyn Dictionary>) {
        self.dictionaries.insert(dictionary.id(), dictionary);
    }

    pub fn get(&self, id: &str) -> Result<&dyn Dictionary, GenerationError> {
        self.dictionaries
            .get(id)
            .map(|dictionary| dictionary.as_ref())
            .ok_or_else(|| GenerationError::InvalidTemplate(format!("invalid generator '{id}' specified")))
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.dictionaries.keys().copied().collect()
    }
}
