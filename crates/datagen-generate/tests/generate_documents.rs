use async_trait::async_trait;
use serde_json::json;

use datagen_core::{Document, DocumentId, FieldValue, TextEncoding};
use datagen_generate::assets::AssetSource;
use datagen_generate::errors::GenerationError;
use datagen_generate::{
    DictionarySet, GenerateOptions, Generator, NoProgress, OutputSink, ProgressReporter,
    SinkError, TraceSink,
};
use datagen_template::{Template, TemplateError};

/// Keeps every written document in memory, in write order.
#[derive(Debug, Default)]
struct RecordingSink {
    cleared: usize,
    documents: Vec<(String, DocumentId, Document)>,
}

impl RecordingSink {
    fn collection(&self, name: &str) -> Vec<&(String, DocumentId, Document)> {
        self.documents
            .iter()
            .filter(|(collection, _, _)| collection == name)
            .collect()
    }
}

#[async_trait]
impl OutputSink for RecordingSink {
    fn kind(&self) -> &'static str {
        "recording"
    }

    async fn clear(&mut self) -> Result<(), SinkError> {
        self.cleared += 1;
        self.documents.clear();
        Ok(())
    }

    async fn write(
        &mut self,
        collection: &str,
        document: &Document,
    ) -> Result<DocumentId, SinkError> {
        let id = DocumentId::Opaque(format!("{collection}-{}", self.documents.len()));
        self.documents
            .push((collection.to_string(), id.clone(), document.clone()));
        Ok(id)
    }
}

#[derive(Debug, Default)]
struct CountingProgress {
    started: Vec<(String, u64)>,
    last: u64,
    finished: usize,
}

impl ProgressReporter for CountingProgress {
    fn start(&mut self, collection: &str, total: u64) {
        self.started.push((collection.to_string(), total));
    }

    fn advance(&mut self, done: u64) {
        self.last = done;
    }

    fn finish(&mut self) {
        self.finished += 1;
    }
}

fn dictionaries() -> DictionarySet {
    DictionarySet::load(&AssetSource::bundled()).expect("load bundled dictionaries")
}

fn template(value: serde_json::Value) -> Template {
    serde_json::from_value(value).expect("template json")
}

fn seeded(seed: u64) -> GenerateOptions {
    GenerateOptions {
        seed: Some(seed),
        ..GenerateOptions::default()
    }
}

fn authors_and_posts() -> Template {
    template(json!([
        {
            "collection_name": "authors",
            "count": 2,
            "fields": [
                {"name": "name", "generator": "names", "subfield": "full_name", "size": 1}
            ]
        },
        {
            "collection_name": "posts",
            "count": 3,
            "fields": [
                {"name": "author", "type": "ref:authors"},
                {"name": "headline", "generator": "words", "type": "headline", "size": [2, 5]},
                {"name": "tags", "generator": "words", "type": "list", "size": 3}
            ]
        }
    ]))
}

#[tokio::test]
async fn writes_requested_counts_with_valid_references() {
    let dictionaries = dictionaries();
    let generator = Generator::new(&dictionaries, seeded(1)).expect("generator");
    let mut sink = RecordingSink::default();
    let mut progress = CountingProgress::default();

    let report = generator
        .run(&authors_and_posts(), &mut sink, &mut progress)
        .await
        .expect("run generation");

    assert_eq!(sink.cleared, 1);
    assert!(report.cleared);
    let authors = sink.collection("authors");
    let posts = sink.collection("posts");
    assert_eq!(authors.len(), 2);
    assert_eq!(posts.len(), 3);

    let author_ids: Vec<&DocumentId> = authors.iter().map(|(_, id, _)| id).collect();
    for (_, _, post) in &posts {
        let reference = post
            .get("author")
            .and_then(FieldValue::as_reference)
            .expect("author reference");
        assert_eq!(reference.collection, "authors");
        assert_eq!(reference.database, "datagen");
        assert!(author_ids.contains(&&reference.id));

        let headline = post.get("headline").and_then(FieldValue::as_text).expect("headline");
        assert!((2..5).contains(&headline.split(' ').count()));
        assert_eq!(post.get("tags").and_then(FieldValue::as_list).map(<[String]>::len), Some(3));
    }

    assert_eq!(report.documents_total, 5);
    let posts_report = report.collection("posts").expect("posts report");
    assert_eq!(posts_report.documents_written, 3);
    assert_eq!(posts_report.references_resolved, 3);
    assert_eq!(report.generator_usage.get("words"), Some(&6));

    assert_eq!(
        progress.started,
        vec![("authors".to_string(), 2), ("posts".to_string(), 3)]
    );
    assert_eq!(progress.last, 3);
    assert_eq!(progress.finished, 2);
}

#[tokio::test]
async fn preserve_database_skips_clear() {
    let dictionaries = dictionaries();
    let options = GenerateOptions {
        preserve_database: true,
        ..seeded(2)
    };
    let generator = Generator::new(&dictionaries, options).expect("generator");
    let mut sink = RecordingSink::default();

    let report = generator
        .run(&authors_and_posts(), &mut sink, &mut NoProgress)
        .await
        .expect("run generation");

    assert_eq!(sink.cleared, 0);
    assert!(!report.cleared);
    assert_eq!(sink.documents.len(), 5);
}

#[tokio::test]
async fn forward_reference_fails_before_writing() {
    let dictionaries = dictionaries();
    let generator = Generator::new(&dictionaries, seeded(3)).expect("generator");
    let mut sink = RecordingSink::default();
    let forward = template(json!([
        {
            "collection_name": "posts",
            "count": 1,
            "fields": [{"name": "author", "type": "ref:authors"}]
        },
        {
            "collection_name": "authors",
            "count": 1,
            "fields": [{"name": "name", "generator": "names", "size": 1}]
        }
    ]));

    let err = generator
        .run(&forward, &mut sink, &mut NoProgress)
        .await
        .expect_err("forward reference");
    match err {
        GenerationError::Template(TemplateError::Invalid(report)) => {
            assert!(report.has_error("forward_reference"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(sink.cleared, 0);
    assert!(sink.documents.is_empty());
}

#[tokio::test]
async fn unknown_generator_is_rejected() {
    let dictionaries = dictionaries();
    let generator = Generator::new(&dictionaries, seeded(3)).expect("generator");
    let mut sink = RecordingSink::default();
    let unknown = template(json!([
        {
            "collection_name": "things",
            "count": 1,
            "fields": [{"name": "label", "generator": "colours", "size": 1}]
        }
    ]));

    let result = generator.run(&unknown, &mut sink, &mut NoProgress).await;
    assert!(matches!(
        result,
        Err(GenerationError::Template(TemplateError::Invalid(_)))
    ));
}

#[tokio::test]
async fn fields_without_generator_are_omitted() {
    let dictionaries = dictionaries();
    let generator = Generator::new(&dictionaries, seeded(4)).expect("generator");
    let mut sink = RecordingSink::default();
    let sparse = template(json!([
        {
            "collection_name": "notes",
            "count": 2,
            "fields": [
                {"name": "note", "type": "body"},
                {"name": "code", "generator": "numbers", "type": "us-ssn", "size": 1}
            ]
        }
    ]));

    let report = generator
        .run(&sparse, &mut sink, &mut NoProgress)
        .await
        .expect("run generation");

    for (_, _, document) in &sink.documents {
        assert!(!document.contains("note"));
        let code = document.get("code").and_then(FieldValue::as_text).expect("bare string");
        assert_eq!(code.len(), 11);
    }
    assert_eq!(report.collection("notes").map(|c| c.fields_omitted), Some(2));
    assert_eq!(report.warnings.len(), 1);
}

#[tokio::test]
async fn html_encoding_wraps_body_paragraphs() {
    let dictionaries = dictionaries();
    let options = GenerateOptions {
        encoding: TextEncoding::Html,
        ..seeded(5)
    };
    let generator = Generator::new(&dictionaries, options).expect("generator");
    let mut sink = RecordingSink::default();
    let articles = template(json!([
        {
            "collection_name": "articles",
            "count": 1,
            "fields": [{"name": "body", "generator": "lipsum", "type": "body", "size": [60, 80]}]
        }
    ]));

    generator
        .run(&articles, &mut sink, &mut NoProgress)
        .await
        .expect("run generation");

    let (_, _, document) = &sink.documents[0];
    let body = document.get("body").and_then(FieldValue::as_text).expect("body");
    assert!(body.starts_with("<p>"));
    assert!(body.ends_with("</p>"));
    assert!(!body.contains('\n'));
    assert!(!body.contains('\t'));
}

#[tokio::test]
async fn same_seed_prints_identical_trace() {
    let dictionaries = dictionaries();
    let mut outputs = Vec::new();
    for _ in 0..2 {
        let generator = Generator::new(&dictionaries, seeded(99)).expect("generator");
        let mut sink = TraceSink::new(Vec::new()).with_id_seed(99);
        generator
            .run(&authors_and_posts(), &mut sink, &mut NoProgress)
            .await
            .expect("run generation");
        assert_eq!(sink.written(), 5);
        outputs.push(String::from_utf8(sink.into_inner()).expect("utf-8 trace"));
    }

    assert_eq!(outputs[0], outputs[1]);
    let first: serde_json::Value =
        serde_json::from_str(outputs[0].lines().next().expect("first line")).expect("json line");
    assert_eq!(first["collection"], "authors");
    assert!(first["document"]["name"].is_string());
}

#[test]
fn grammar_options_are_checked() {
    let dictionaries = dictionaries();
    let mut options = GenerateOptions::default();
    options.grammar.jitter = options.grammar.para_len;
    assert!(matches!(
        Generator::new(&dictionaries, options),
        Err(GenerationError::InvalidOptions(_))
    ));
}
