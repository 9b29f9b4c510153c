use std::collections::{HashMap, HashSet};
use std::path::Path;

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::errors::{IssueSeverity, TemplateError, ValidationIssue, ValidationReport};
use crate::model::{CollectionDef, FieldDef, NameField, SizeSpec, Template};
use crate::schema::template_json_schema;

const NAMES_GENERATOR: &str = "names";

/// Validated template with accumulated warnings.
#[derive(Debug, Clone)]
pub struct ValidatedTemplate {
    pub template: Template,
    pub warnings: Vec<ValidationIssue>,
}

/// Read and validate a template file.
pub fn load_template(
    path: &Path,
    known_generators: &[&str],
) -> Result<ValidatedTemplate, TemplateError> {
    let contents = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_template(&contents, known_generators)
}

/// Parse template text and run structural and semantic validation.
pub fn parse_template(
    contents: &str,
    known_generators: &[&str],
) -> Result<ValidatedTemplate, TemplateError> {
    let json: Value = serde_json::from_str(contents)?;

    let structural = validate_template_json(&json)?;
    if !structural.is_ok() {
        return Err(TemplateError::Invalid(structural));
    }

    let template: Template = serde_json::from_value(json).map_err(|err| {
        let mut report = ValidationReport::default();
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "invalid_template_json",
            "/",
            err.to_string(),
            None,
        ));
        TemplateError::Invalid(report)
    })?;

    let report = validate_template(&template, known_generators);
    if !report.is_ok() {
        return Err(TemplateError::Invalid(report));
    }

    Ok(ValidatedTemplate {
        template,
        warnings: report.warnings,
    })
}

/// Validate a template JSON document against the template JSON Schema.
pub fn validate_template_json(template_json: &Value) -> Result<ValidationReport, TemplateError> {
    let schema = serde_json::to_value(template_json_schema())?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| TemplateError::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(template_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_violation",
                path,
                error.to_string(),
                None,
            ));
        }
    }

    Ok(report)
}

/// Semantic checks that the JSON Schema cannot express.
pub fn validate_template(template: &Template, known_generators: &[&str]) -> ValidationReport {
    let mut report = ValidationReport::default();

    if template.collections.is_empty() {
        report.push_warning(ValidationIssue::new(
            IssueSeverity::Warning,
            "template_empty",
            "/",
            "template declares no collections".to_string(),
            None,
        ));
        return report;
    }

    let positions = collection_positions(&template.collections, &mut report);

    for (idx, collection) in template.collections.iter().enumerate() {
        let base_path = format!("/{idx}");
        let ctx = CollectionScope {
            index: idx,
            collection,
            positions: &positions,
            template,
        };
        validate_fields(&ctx, &base_path, known_generators, &mut report);
    }

    report
}

struct CollectionScope<'a> {
    index: usize,
    collection: &'a CollectionDef,
    positions: &'a HashMap<&'a str, usize>,
    template: &'a Template,
}

fn collection_positions<'a>(
    collections: &'a [CollectionDef],
    report: &mut ValidationReport,
) -> HashMap<&'a str, usize> {
    let mut positions = HashMap::new();

    for (idx, collection) in collections.iter().enumerate() {
        let name = collection.collection_name.as_str();
        if name.trim().is_empty() {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "collection_name_empty",
                format!("/{idx}/collection_name"),
                "collection_name must not be empty".to_string(),
                None,
            ));
            continue;
        }
        if positions.contains_key(name) {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "duplicate_collection",
                format!("/{idx}/collection_name"),
                format!("collection '{name}' is declared more than once"),
                Some("merge duplicate collections into a single entry".to_string()),
            ));
            continue;
        }
        positions.insert(name, idx);
    }

    positions
}

fn validate_fields(
    ctx: &CollectionScope<'_>,
    base_path: &str,
    known_generators: &[&str],
    report: &mut ValidationReport,
) {
    let mut seen = HashSet::new();

    for (idx, field) in ctx.collection.fields.iter().enumerate() {
        let path = format!("{base_path}/fields/{idx}");

        if field.name.trim().is_empty() {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "field_name_empty",
                format!("{path}/name"),
                "field name must not be empty".to_string(),
                None,
            ));
        } else if !seen.insert(field.name.as_str()) {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "duplicate_field",
                format!("{path}/name"),
                format!(
                    "field '{}' appears more than once in '{}'; the last definition wins",
                    field.name, ctx.collection.collection_name
                ),
                None,
            ));
        }

        match field.generator.as_deref() {
            Some(generator) => {
                validate_generated_field(field, generator, &path, known_generators, report)
            }
            None => validate_plain_field(ctx, field, &path, report),
        }
    }
}

fn validate_generated_field(
    field: &FieldDef,
    generator: &str,
    path: &str,
    known_generators: &[&str],
    report: &mut ValidationReport,
) {
    if !known_generators.contains(&generator) {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "unknown_generator",
            format!("{path}/generator"),
            format!("invalid generator '{generator}' for field '{}'", field.name),
            Some(format!("use one of: {}", known_generators.join(", "))),
        ));
    }

    if let Some(SizeSpec::Range(low, high)) = field.size
        && low >= high
    {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "invalid_size",
            format!("{path}/size"),
            format!(
                "size range [{low}, {high}) for field '{}' is empty",
                field.name
            ),
            Some("use [low, high) with low < high".to_string()),
        ));
    }

    if let Some(subfield) = field.subfield.as_deref() {
        if generator != NAMES_GENERATOR {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "subfield_ignored",
                format!("{path}/subfield"),
                format!(
                    "subfield is only used by the '{NAMES_GENERATOR}' generator; field '{}' uses '{generator}'",
                    field.name
                ),
                None,
            ));
        } else if let Err(message) = subfield.parse::<NameField>() {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "unknown_subfield",
                format!("{path}/subfield"),
                format!("{message} for field '{}'", field.name),
                Some(format!(
                    "use one of: {}",
                    NameField::ALL
                        .iter()
                        .map(NameField::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            ));
        }
    }

    if field
        .field_type()
        .is_some_and(|value| value.starts_with(datagen_core::REFERENCE_PREFIX))
    {
        report.push_warning(ValidationIssue::new(
            IssueSeverity::Warning,
            "reference_with_generator",
            format!("{path}/type"),
            format!(
                "field '{}' has a generator, so its reference type is treated as a plain type",
                field.name
            ),
            Some("drop the generator to build a reference".to_string()),
        ));
    }
}

fn validate_plain_field(
    ctx: &CollectionScope<'_>,
    field: &FieldDef,
    path: &str,
    report: &mut ValidationReport,
) {
    let Some(target) = field.reference_target() else {
        report.push_warning(ValidationIssue::new(
            IssueSeverity::Warning,
            "field_omitted",
            path.to_string(),
            format!(
                "field '{}' has no generator and is not a reference; it will be omitted",
                field.name
            ),
            None,
        ));
        return;
    };

    let type_path = format!("{path}/type");

    if target.is_empty() {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "reference_target_empty",
            type_path,
            format!("field '{}' references an unnamed collection", field.name),
            Some("use ref:<collection_name>".to_string()),
        ));
        return;
    }

    match ctx.positions.get(target) {
        None => report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "unknown_collection",
            type_path,
            format!(
                "field '{}' requests reference to collection '{target}' which does not exist",
                field.name
            ),
            None,
        )),
        Some(&position) if position == ctx.index => report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "self_reference",
            type_path,
            format!(
                "field '{}' references its own collection '{target}'",
                field.name
            ),
            None,
        )),
        Some(&position) if position > ctx.index => report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "forward_reference",
            type_path,
            format!(
                "field '{}' requests reference to collection '{target}' before it is defined",
                field.name
            ),
            Some(format!(
                "declare '{target}' before '{}'",
                ctx.collection.collection_name
            )),
        )),
        Some(_) => {
            let empty = ctx
                .template
                .collection(target)
                .is_some_and(|collection| collection.count == 0);
            if empty {
                report.push_error(ValidationIssue::new(
                    IssueSeverity::Error,
                    "empty_reference_target",
                    type_path,
                    format!(
                        "field '{}' references collection '{target}' which generates no documents",
                        field.name
                    ),
                    Some(format!("give '{target}' a count above zero")),
                ));
            }
        }
    }
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
