use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use datagen_generate::assets::{AssetSource, LOREM_FILE, NAMES_FILE, WORDS_FILE};
use datagen_generate::dictionary::{NamesDictionary, WordsDictionary};
use datagen_generate::errors::GenerationError;
use datagen_generate::{Dictionary, DictionarySet, SampleOptions};
use datagen_template::SizeSpec;

fn temp_assets(files: &[(&str, &str)]) -> PathBuf {
    let root = std::env::temp_dir().join(format!("datagen-assets-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp asset dir");
    for (name, contents) in files {
        fs::write(root.join(name), contents).expect("write asset file");
    }
    root
}

fn full_assets() -> PathBuf {
    temp_assets(&[
        (
            NAMES_FILE,
            "Ada,Lovelace,K,Ada K. Lovelace\nAlan,Turing,M,Alan M. Turing\n",
        ),
        (WORDS_FILE, "harbor\nlantern\n\nmeadow\n"),
        (LOREM_FILE, "lorem ipsum dolor\nsit amet\n"),
    ])
}

#[test]
fn loads_every_standard_dictionary() {
    let root = full_assets();
    let set = DictionarySet::load(&AssetSource::new(&root)).expect("load dictionaries");
    assert_eq!(set.ids(), vec!["lipsum", "names", "numbers", "words"]);
    assert_eq!(set.get("words").expect("words").len(), 3);
    assert_eq!(set.get("lipsum").expect("lipsum").len(), 5);
    assert_eq!(set.get("names").expect("names").len(), 2);
    fs::remove_dir_all(root).ok();
}

#[test]
fn bundled_assets_load() {
    let set = DictionarySet::load(&AssetSource::bundled()).expect("load bundled dictionaries");
    for id in ["names", "words", "lipsum"] {
        assert!(!set.get(id).expect("dictionary").is_empty(), "{id} is empty");
    }
}

#[test]
fn missing_file_names_the_path() {
    let root = temp_assets(&[(WORDS_FILE, "harbor\n")]);
    let err = DictionarySet::load(&AssetSource::new(&root)).expect_err("names file is missing");
    match err {
        GenerationError::Dictionary { kind, path, .. } => {
            assert_eq!(kind, "Names");
            assert!(path.ends_with(NAMES_FILE), "unexpected path {path}");
        }
        other => panic!("unexpected error: {other}"),
    }
    fs::remove_dir_all(root).ok();
}

#[test]
fn malformed_names_row_is_reported() {
    let root = temp_assets(&[(NAMES_FILE, "Ada,Lovelace\n")]);
    let result = NamesDictionary::load(&root.join(NAMES_FILE));
    assert!(matches!(
        result,
        Err(GenerationError::DictionaryFormat { kind: "Names", .. })
    ));
    fs::remove_dir_all(root).ok();
}

#[test]
fn words_sample_exact_count_from_source() {
    let words = WordsDictionary::from_words(vec!["harbor".to_string(), "lantern".to_string()]);
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let sampled = words
        .sample(12, &SampleOptions::default(), &mut rng)
        .expect("sample words");
    assert_eq!(sampled.len(), 12);
    assert!(sampled.iter().all(|word| word == "harbor" || word == "lantern"));
}

#[test]
fn sized_sample_respects_range() {
    let words = WordsDictionary::from_words(vec!["harbor".to_string()]);
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let size = SizeSpec::Range(2, 5);
    for _ in 0..100 {
        let sampled = words
            .sample_sized(Some(&size), &SampleOptions::default(), &mut rng)
            .expect("sample words");
        assert!((2..5).contains(&sampled.len()));
    }
}

#[test]
fn names_project_subfield() {
    let root = full_assets();
    let names = NamesDictionary::load(&root.join(NAMES_FILE)).expect("load names");
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let firsts = names
        .sample(
            10,
            &SampleOptions {
                field_type: None,
                subfield: Some("first_name"),
            },
            &mut rng,
        )
        .expect("sample first names");
    assert!(firsts.iter().all(|name| name == "Ada" || name == "Alan"));

    let full = names
        .sample(4, &SampleOptions::default(), &mut rng)
        .expect("sample full names");
    assert!(full.iter().all(|name| name.ends_with("Lovelace") || name.ends_with("Turing")));
    fs::remove_dir_all(root).ok();
}

#[test]
fn unknown_subfield_is_a_template_error() {
    let root = full_assets();
    let names = NamesDictionary::load(&root.join(NAMES_FILE)).expect("load names");
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let result = names.sample(
        1,
        &SampleOptions {
            field_type: None,
            subfield: Some("nickname"),
        },
        &mut rng,
    );
    assert!(matches!(result, Err(GenerationError::InvalidTemplate(_))));
    fs::remove_dir_all(root).ok();
}

#[test]
fn telephone_numbers_follow_layout() {
    let set = DictionarySet::load(&AssetSource::bundled()).expect("load bundled dictionaries");
    let numbers = set.get("numbers").expect("numbers dictionary");
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let values = numbers
        .sample(
            3,
            &SampleOptions {
                field_type: Some("us-telno"),
                subfield: None,
            },
            &mut rng,
        )
        .expect("sample telephone numbers");

    assert_eq!(values.len(), 3);
    for value in values {
        let bytes = value.as_bytes();
        assert_eq!(value.len(), 15, "unexpected shape {value}");
        assert_eq!(&value[..3], "+1(");
        assert_eq!(bytes[6], b')');
        assert_eq!(bytes[10], b'-');
        let digits: String = value[3..6]
            .chars()
            .chain(value[7..10].chars())
            .chain(value[11..].chars())
            .collect();
        assert_eq!(digits.len(), 10);
        assert!(digits.chars().all(|ch| ('1'..='9').contains(&ch)));
    }
}

#[test]
fn unpatterned_numbers_are_one_digit_string() {
    let set = DictionarySet::load(&AssetSource::bundled()).expect("load bundled dictionaries");
    let numbers = set.get("numbers").expect("numbers dictionary");
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let values = numbers
        .sample(6, &SampleOptions::default(), &mut rng)
        .expect("sample digits");
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].len(), 6);
}
