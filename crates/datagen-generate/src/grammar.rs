//! Grammar transforms that shape sampled tokens into stored text.

use rand::{Rng, RngCore};

use datagen_core::FieldValue;

use crate::model::GrammarOptions;

/// Transform selected by a field's `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// Tokens joined with single spaces, case untouched.
    Plain,
    Headline,
    Body,
    List,
}

impl Grammar {
    pub fn for_field_type(field_type: Option<&str>) -> Self {
        match field_type {
            Some("body") => Grammar::Body,
            Some("headline") => Grammar::Headline,
            Some("list") => Grammar::List,
            _ => Grammar::Plain,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Grammar::Plain => "plain",
            Grammar::Headline => "headline",
            Grammar::Body => "body",
            Grammar::List => "list",
        }
    }

    pub fn apply(
        &self,
        tokens: &[String],
        options: &GrammarOptions,
        rng: &mut dyn RngCore,
    ) -> FieldValue {
        match self {
            Grammar::Plain => FieldValue::Text(plain(tokens)),
            Grammar::Headline => FieldValue::Text(headline(tokens)),
            Grammar::Body => FieldValue::Text(body(tokens, options, rng)),
            Grammar::List => FieldValue::List(list(tokens)),
        }
    }
}

pub fn plain(tokens: &[String]) -> String {
    tokens.join(" ")
}

/// Every token lowercased, then capitalized.
pub fn headline(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|token| capitalize(&token.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn list(tokens: &[String]) -> Vec<String> {
    tokens.iter().map(|token| token.to_lowercase()).collect()
}

/// Lowercased tokens with a capitalized first word, randomized commas and
/// semicolons, and a closing `". "`.
///
/// Thresholds are re-rolled for every token. Punctuation is never attached to
/// the final token.
pub fn sentence(tokens: &[String], options: &GrammarOptions, rng: &mut dyn RngCore) -> String {
    let mut last_comma = 0;
    let mut last_semicolon = 0;
    let mut words = Vec::with_capacity(tokens.len());

    for (idx, token) in tokens.iter().enumerate() {
        let comma_threshold = randomize(options.comma_freq, options.jitter, rng);
        let semicolon_threshold = randomize(options.semicolon_freq, options.jitter, rng);

        let mut word = token.to_lowercase();
        if idx == 0 {
            word = capitalize(&word);
        }

        if idx + 1 < tokens.len() {
            if last_comma + comma_threshold < idx {
                word.push(',');
                last_comma = idx;
            }
            if last_semicolon + semicolon_threshold < idx {
                word.push(';');
                last_semicolon = idx;
            }
        }

        words.push(word);
    }

    format!("{}. ", words.join(" "))
}

/// Tab-indented paragraphs of sentences separated by blank lines, ending in
/// exactly one blank line.
pub fn body(tokens: &[String], options: &GrammarOptions, rng: &mut dyn RngCore) -> String {
    let mut output = String::from("\t");
    let mut para_len = randomize(options.para_len, options.jitter, rng).max(1);
    let mut sentences = 0;
    let mut pos = 0;

    while pos < tokens.len() {
        let sentence_len = randomize(options.sentence_len, options.jitter, rng).max(1);
        let end = (pos + sentence_len).min(tokens.len());
        output.push_str(&sentence(&tokens[pos..end], options, rng));
        sentences += 1;
        pos = end;

        if sentences >= para_len && pos < tokens.len() {
            output.truncate(output.trim_end().len());
            output.push_str("\n\n\t");
            sentences = 0;
            para_len = randomize(options.para_len, options.jitter, rng).max(1);
        }
    }

    output.truncate(output.trim_end().len());
    output.push_str("\n\n");
    output
}

/// Uniform draw from `[mean - jitter, mean + jitter)`.
pub fn randomize(mean: u32, jitter: u32, rng: &mut dyn RngCore) -> usize {
    let low = mean.saturating_sub(jitter);
    let high = mean.saturating_add(jitter);
    if low >= high {
        return mean as usize;
    }
    rng.random_range(low..high) as usize
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
