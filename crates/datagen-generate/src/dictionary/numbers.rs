use rand::{Rng, RngCore};

use crate::dictionary::{Dictionary, SampleOptions};
use crate::errors::GenerationError;

/// Named digit pattern: group lengths plus a layout with `{0}`, `{1}`, ... slots.
#[derive(Debug, Clone, Copy)]
pub struct NumberPattern {
    pub key: &'static str,
    pub groups: &'static [usize],
    pub layout: &'static str,
}

pub const PATTERNS: &[NumberPattern] = &[
    NumberPattern {
        key: "us-telno",
        groups: &[3, 3, 4],
        layout: "+1({0}){1}-{2}",
    },
    NumberPattern {
        key: "us-ssn",
        groups: &[3, 2, 4],
        layout: "{0}-{1}-{2}",
    },
];

/// Pseudorandom formatted numbers; needs no source file.
///
/// With a known pattern, `sample(n)` yields `n` formatted strings. Otherwise it
/// yields a single string of `n` digits. Digits are always drawn from 1-9.
#[derive(Debug, Clone, Default)]
pub struct NumbersDictionary;

impl NumbersDictionary {
    pub const ID: &'static str = "numbers";

    pub fn new() -> Self {
        Self
    }

    pub fn pattern(key: &str) -> Option<&'static NumberPattern> {
        PATTERNS.iter().find(|pattern| pattern.key == key)
    }

    /// One formatted value for a known pattern.
    pub fn format(&self, key: &str, rng: &mut dyn RngCore) -> Option<String> {
        Self::pattern(key).map(|pattern| format_pattern(pattern, rng))
    }
}

impl Dictionary for NumbersDictionary {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn len(&self) -> usize {
        PATTERNS.len()
    }

    fn is_formatted(&self) -> bool {
        true
    }

    fn sample(
        &self,
        count: usize,
        options: &SampleOptions<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<String>, GenerationError> {
        match options.field_type.and_then(Self::pattern) {
            Some(pattern) => Ok((0..count).map(|_| format_pattern(pattern, rng)).collect()),
            None => Ok(vec![random_digits(count, rng)]),
        }
    }
}

fn format_pattern(pattern: &NumberPattern, rng: &mut dyn RngCore) -> String {
    let mut output = pattern.layout.to_string();
    for (idx, length) in pattern.groups.iter().enumerate() {
        let digits = random_digits(*length, rng);
        output = output.replace(&format!("{{{idx}}}"), &digits);
    }
    output
}

fn random_digits(length: usize, rng: &mut dyn RngCore) -> String {
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(1..=9u8)))
        .collect()
}
