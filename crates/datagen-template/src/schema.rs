use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::Template;

/// Emit the JSON Schema for template files.
pub fn template_json_schema() -> RootSchema {
    schema_for!(Template)
}
