use std::path::Path;

use rand::RngCore;

use crate::assets::read_lines;
use crate::dictionary::{Dictionary, SampleOptions, sample_words};
use crate::errors::GenerationError;

/// English word list, one word per line.
#[derive(Debug, Clone)]
pub struct WordsDictionary {
    words: Vec<String>,
}

impl WordsDictionary {
    pub const ID: &'static str = "words";

    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        let words = read_lines("Words", path)?;
        if words.is_empty() {
            return Err(GenerationError::DictionaryFormat {
                kind: "Words",
                path: path.display().to_string(),
                message: "no words found".to_string(),
            });
        }
        Ok(Self { words })
    }

    pub fn from_words(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl Dictionary for WordsDictionary {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn sample(
        &self,
        count: usize,
        _options: &SampleOptions<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<String>, GenerationError> {
        sample_words(Self::ID, &self.words, count, rng)
    }
}
