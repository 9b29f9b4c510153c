use std::path::Path;

use rand::RngCore;

use crate::assets::read_text;
use crate::dictionary::{Dictionary, SampleOptions, sample_words};
use crate::errors::GenerationError;

/// Lorem-ipsum corpus split on whitespace.
#[derive(Debug, Clone)]
pub struct LipsumDictionary {
    words: Vec<String>,
}

impl LipsumDictionary {
    pub const ID: &'static str = "lipsum";

    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        let text = read_text("Lipsum", path)?;
        let dictionary = Self::from_text(&text);
        if dictionary.words.is_empty() {
            return Err(GenerationError::DictionaryFormat {
                kind: "Lipsum",
                path: path.display().to_string(),
                message: "corpus is empty".to_string(),
            });
        }
        Ok(dictionary)
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_string).collect(),
        }
    }
}

impl Dictionary for LipsumDictionary {
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
