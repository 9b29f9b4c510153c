//! Generate the sample template to stdout without a database.

use datagen_generate::assets::AssetSource;
use datagen_generate::{DictionarySet, GenerateOptions, Generator, NoProgress, TraceSink};
use datagen_template::{SAMPLE_TEMPLATE, parse_template};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dictionaries = DictionarySet::load(&AssetSource::bundled())?;
    let validated = parse_template(SAMPLE_TEMPLATE, &dictionaries.ids())?;

    let options = GenerateOptions {
        seed: Some(7),
        ..GenerateOptions::default()
    };
    let generator = Generator::new(&dictionaries, options)?;
    let mut sink = TraceSink::stdout().with_id_seed(7);
    let report = generator
        .run(&validated.template, &mut sink, &mut NoProgress)
        .await?;

    eprintln!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
