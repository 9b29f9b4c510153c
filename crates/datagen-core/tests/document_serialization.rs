use datagen_core::{Document, DocumentId, FieldValue, Reference, TextEncoding};

#[test]
fn serializes_document_in_field_order() {
    let mut document = Document::new();
    document.insert("title", FieldValue::Text("Quiet Harbor".to_string()));
    document.insert(
        "tags",
        FieldValue::List(vec!["sea".to_string(), "night".to_string()]),
    );
    document.insert(
        "author",
        FieldValue::Reference(Reference::new(
            "authors",
            DocumentId::ObjectId("65f1c0ffee0000000000abcd".to_string()),
            "datagen",
        )),
    );

    let json = serde_json::to_string_pretty(&document).expect("serialize document");
    let expected = r#"{
  "title": "Quiet Harbor",
  "tags": [
    "sea",
    "night"
  ],
  "author": {
    "$ref": "authors",
    "$id": "65f1c0ffee0000000000abcd",
    "$db": "datagen"
  }
}"#;
    assert_eq!(json, expected);
}

#[test]
fn encoding_applies_to_each_list_item_and_skips_references() {
    let list = FieldValue::List(vec!["ab".to_string(), "c".to_string()]);
    let encoded = TextEncoding::Base64.encode(list).expect("encode list");
    assert_eq!(
        encoded,
        FieldValue::List(vec!["YWI=".to_string(), "Yw==".to_string()])
    );

    let reference = FieldValue::Reference(Reference::new(
        "authors",
        DocumentId::Opaque("naïve-id".to_string()),
        "datagen",
    ));
    let encoded = TextEncoding::Ascii
        .encode(reference.clone())
        .expect("references are not encoded");
    assert_eq!(encoded, reference);
}
