use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use datagen_core::REFERENCE_PREFIX;

/// Ordered list of collection definitions; generation follows this order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Template {
    pub collections: Vec<CollectionDef>,
}

impl Template {
    pub fn collection(&self, name: &str) -> Option<&CollectionDef> {
        self.collections
            .iter()
            .find(|collection| collection.collection_name == name)
    }

    /// Total number of documents the template asks for.
    pub fn total_documents(&self) -> u64 {
        self.collections
            .iter()
            .map(|collection| collection.count)
            .sum()
    }
}

/// A collection to populate and the fields of each of its documents.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CollectionDef {
    /// Target collection name, unique within the template.
    pub collection_name: String,
    /// Number of documents to generate.
    pub count: u64,
    /// Field definitions, resolved in order for every document.
    pub fields: Vec<FieldDef>,
}

/// How a single document field is produced.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldDef {
    /// Document key.
    pub name: String,
    /// Dictionary to sample (`words`, `names`, `lipsum`, `numbers`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    /// Shape of the value: `body`, `headline`, `list`, a number pattern, or `ref:<collection>`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    /// Number of tokens to sample, fixed or drawn from `[low, high)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeSpec>,
    /// Projection for the `names` generator (default `full_name`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subfield: Option<String>,
}

impl FieldDef {
    /// Target collection when this field is a `ref:<collection>` without a generator.
    pub fn reference_target(&self) -> Option<&str> {
        if self.generator.is_some() {
            return None;
        }
        self.field_type
            .as_deref()
            .and_then(|value| value.strip_prefix(REFERENCE_PREFIX))
    }

    pub fn field_type(&self) -> Option<&str> {
        self.field_type.as_deref()
    }
}

/// Requested sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SizeSpec {
    Fixed(u64),
    /// Half-open `[low, high)` range.
    Range(u64, u64),
}

impl SizeSpec {
    pub fn is_well_formed(&self) -> bool {
        match self {
            SizeSpec::Fixed(_) => true,
            SizeSpec::Range(low, high) => low < high,
        }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeSpec::Fixed(value) => write!(f, "{value}"),
            SizeSpec::Range(low, high) => write!(f, "[{low}, {high})"),
        }
    }
}

/// Projection of a name record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameField {
    FirstName,
    LastName,
    MiddleInit,
    #[default]
    FullName,
}

impl NameField {
    pub const ALL: [NameField; 4] = [
        NameField::FirstName,
        NameField::LastName,
        NameField::MiddleInit,
        NameField::FullName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NameField::FirstName => "first_name",
            NameField::LastName => "last_name",
            NameField::MiddleInit => "middle_init",
            NameField::FullName => "full_name",
        }
    }
}

impl FromStr for NameField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NameField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| format!("invalid name subfield '{value}'"))
    }
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
