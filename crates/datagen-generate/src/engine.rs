use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use datagen_core::{Document, FieldValue, Reference};
use datagen_template::{CollectionDef, FieldDef, Template, TemplateError, validate_template};

use crate::dictionary::{DictionarySet, SampleOptions};
use crate::errors::GenerationError;
use crate::grammar::Grammar;
use crate::model::{CollectionReport, GenerateOptions, GenerationReport};
use crate::progress::ProgressReporter;
use crate::registry::IdRegistry;
use crate::sink::OutputSink;

/// Entry point for generating documents from a template.
#[derive(Debug)]
pub struct Generator<'a> {
    dictionaries: &'a DictionarySet,
    options: GenerateOptions,
}

impl<'a> Generator<'a> {
    pub fn new(
        dictionaries: &'a DictionarySet,
        options: GenerateOptions,
    ) -> Result<Self, GenerationError> {
        options.grammar.validate()?;
        Ok(Self {
            dictionaries,
            options,
        })
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate every collection in template order and write it to `sink`.
    ///
    /// The first error aborts the run; documents already written stay in the sink.
    pub async fn run<S: OutputSink + ?Sized>(
        &self,
        template: &Template,
        sink: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> Result<GenerationReport, GenerationError> {
        let start = Instant::now();

        let known = self.dictionaries.ids();
        let validation = validate_template(template, &known);
        if !validation.is_ok() {
            return Err(TemplateError::Invalid(validation).into());
        }

        let seed = self.options.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = GenerationReport::new(run_id.clone(), seed, sink.kind(), self.options.encoding);

        for issue in &validation.warnings {
            warn!(event = "template_warning", code = %issue.code, path = %issue.path, "{}", issue.message);
            report.warnings.push(issue.to_string());
        }

        info!(
            event = "generation_started",
            run_id = %run_id,
            seed,
            sink = sink.kind(),
            encoding = %self.options.encoding,
            collections = template.collections.len(),
            documents = template.total_documents()
        );

        if !self.options.preserve_database {
            sink.clear().await?;
            report.cleared = true;
        }

        let mut registry = IdRegistry::new();
        for collection in &template.collections {
            let collection_report = self
                .generate_collection(
                    collection,
                    sink,
                    progress,
                    &mut registry,
                    &mut rng,
                    &mut report,
                )
                .await?;
            report.documents_total += collection_report.documents_written;
            report.collections.push(collection_report);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            event = "generation_completed",
            run_id = %run_id,
            documents = report.documents_total,
            duration_ms = report.duration_ms
        );

        Ok(report)
    }

    async fn generate_collection<S: OutputSink + ?Sized>(
        &self,
        collection: &CollectionDef,
        sink: &mut S,
        progress: &mut dyn ProgressReporter,
        registry: &mut IdRegistry,
        rng: &mut ChaCha8Rng,
        report: &mut GenerationReport,
    ) -> Result<CollectionReport, GenerationError> {
        let start = Instant::now();
        let name = collection.collection_name.as_str();
        let mut stats = CollectionReport {
            collection: name.to_string(),
            documents_requested: collection.count,
            ..CollectionReport::default()
        };

        info!(event = "collection_started", collection = %name, count = collection.count);
        registry.begin_collection(name);
        progress.start(name, collection.count);

        for done in 1..=collection.count {
            let document = self.build_document(collection, registry, rng, report, &mut stats)?;
            let id = sink.write(name, &document).await?;
            debug!(collection = %name, id = %id, "document written");
            registry.record(name, id);
            stats.documents_written += 1;
            progress.advance(done);
        }

        progress.finish();
        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            event = "collection_completed",
            collection = %name,
            documents = stats.documents_written,
            references = stats.references_resolved,
            duration_ms = stats.duration_ms
        );

        Ok(stats)
    }

    fn build_document(
        &self,
        collection: &CollectionDef,
        registry: &IdRegistry,
        rng: &mut dyn RngCore,
        report: &mut GenerationReport,
        stats: &mut CollectionReport,
    ) -> Result<Document, GenerationError> {
        let mut document = Document::new();
        for field in &collection.fields {
            match self.resolve_field(field, registry, rng, report)? {
                Some(value) => {
                    if matches!(value, FieldValue::Reference(_)) {
                        stats.references_resolved += 1;
                    }
                    document.insert(field.name.as_str(), value);
                }
                None => stats.fields_omitted += 1,
            }
        }
        Ok(document)
    }

    /// `None` means the field is left out of the document.
    fn resolve_field(
        &self,
        field: &FieldDef,
        registry: &IdRegistry,
        rng: &mut dyn RngCore,
        report: &mut GenerationReport,
    ) -> Result<Option<FieldValue>, GenerationError> {
        let Some(generator) = field.generator.as_deref() else {
            let Some(target) = field.reference_target() else {
                return Ok(None);
            };
            let id = registry.pick(&field.name, target, rng)?;
            return Ok(Some(FieldValue::Reference(Reference::new(
                target,
                id.clone(),
                self.options.database.as_str(),
            ))));
        };

        let dictionary = self.dictionaries.get(generator)?;
        let options = SampleOptions {
            field_type: field.field_type(),
            subfield: field.subfield.as_deref(),
        };
        let tokens = dictionary.sample_sized(field.size.as_ref(), &options, rng)?;
        report.record_generator_usage(generator);

        let value = if dictionary.is_formatted() {
            FieldValue::from_formatted(tokens)
        } else {
            let grammar = Grammar::for_field_type(field.field_type());
            report.record_grammar_usage(grammar.id());
            grammar.apply(&tokens, &self.options.grammar, rng)
        };

        Ok(Some(self.options.encoding.encode(value)?))
    }
}
