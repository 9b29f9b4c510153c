use std::path::Path;

use rand::{Rng, RngCore};
use serde::Deserialize;

use datagen_template::NameField;

use crate::assets::read_text;
use crate::dictionary::{Dictionary, SampleOptions};
use crate::errors::GenerationError;

/// One row of the names source file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameRecord {
    pub first_name: String,
    pub last_name: String,
    pub middle_init: String,
    pub full_name: String,
}

impl NameRecord {
    pub fn field(&self, field: NameField) -> &str {
        match field {
            NameField::FirstName => &self.first_name,
            NameField::LastName => &self.last_name,
            NameField::MiddleInit => &self.middle_init,
            NameField::FullName => &self.full_name,
        }
    }
}

/// Random person names loaded from a headerless four-column CSV file.
#[derive(Debug, Clone)]
pub struct NamesDictionary {
    records: Vec<NameRecord>,
}

impl NamesDictionary {
    pub const ID: &'static str = "names";

    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        let contents = read_text("Names", path)?;
        let format_error = |message: String| GenerationError::DictionaryFormat {
            kind: "Names",
            path: path.display().to_string(),
            message,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());

        let mut records = Vec::new();
        for row in reader.deserialize::<NameRecord>() {
            records.push(row.map_err(|err| format_error(err.to_string()))?);
        }

        if records.is_empty() {
            return Err(format_error("no name records found".to_string()));
        }

        Ok(Self { records })
    }

    pub fn from_records(records: Vec<NameRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[NameRecord] {
        &self.records
    }
}

impl Dictionary for NamesDictionary {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn sample(
        &self,
        count: usize,
        options: &SampleOptions<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<String>, GenerationError> {
        let field = match options.subfield {
            None => NameField::default(),
            Some(value) => value
                .parse::<NameField>()
                .map_err(GenerationError::InvalidTemplate)?,
        };

        if count > 0 && self.records.is_empty() {
            return Err(GenerationError::InvalidTemplate(format!(
                "dictionary '{}' has no entries to sample",
                Self::ID
            )));
        }

        Ok((0..count)
            .map(|_| {
                let record = &self.records[rng.random_range(0..self.records.len())];
                record.field(field).to_string()
            })
            .collect())
    }
}
