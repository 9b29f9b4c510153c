mod config;
mod logging;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use datagen_core::TextEncoding;
use datagen_generate::assets::AssetSource;
use datagen_generate::{
    DictionarySet, GenerateOptions, GenerationError, Generator, MongoSink, NoProgress, OutputSink,
    ProgressReporter, SinkError, TraceSink,
};
use datagen_template::{SAMPLE_TEMPLATE, TemplateError, load_template};

use config::Config;
use logging::init_logging;
use progress::StderrProgress;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read config file '{path}': {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file '{path}': {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("failed to write report '{path}': {source}")]
    Report {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("a template file is required")]
    MissingTemplate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EncodingArg {
    Html,
    Base64,
    Ascii,
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
}

impl From<EncodingArg> for TextEncoding {
    fn from(value: EncodingArg) -> Self {
        match value {
            EncodingArg::Html => TextEncoding::Html,
            EncodingArg::Base64 => TextEncoding::Base64,
            EncodingArg::Ascii => TextEncoding::Ascii,
            EncodingArg::Utf8 => TextEncoding::Utf8,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "datagen",
    version,
    about = "Populate a MongoDB database with random documents described by a JSON template"
)]
struct Cli {
    /// Template file describing the collections to generate.
    #[arg(value_name = "TEMPLATE", required_unless_present = "create_sample")]
    template: Option<PathBuf>,
    /// Do not display progress.
    #[arg(short = 'n', long)]
    no_progress: bool,
    /// Encoding applied to generated text [default: utf-8].
    #[arg(short, long, value_enum)]
    encoding: Option<EncodingArg>,
    /// Print documents to stdout instead of writing to MongoDB.
    #[arg(short = 't', long)]
    test_output: bool,
    /// MongoDB host [default: localhost].
    #[arg(long)]
    hostname: Option<String>,
    /// MongoDB port [default: 27017].
    #[arg(long)]
    port: Option<u16>,
    /// Target database [default: datagen].
    #[arg(short, long)]
    dbname: Option<String>,
    /// Keep existing data instead of dropping the database first.
    #[arg(short, long)]
    preserve_database: bool,
    /// Print the sample template to stdout and exit.
    #[arg(long)]
    create_sample: bool,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Config file [default: ./datagen.toml when present].
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory holding names.csv, words.txt and lorem.txt.
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,
    /// Write the generation report as JSON.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Validate the template and exit.
    #[arg(long)]
    check: bool,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
    /// Also write JSON logs to this file.
    #[arg(long, value_name = "PATH")]
    log_json: Option<PathBuf>,
}

/// Store and generation settings after layering CLI flags over the config file.
#[derive(Debug, Clone)]
struct Settings {
    hostname: String,
    port: u16,
    dbname: String,
    data_dir: Option<PathBuf>,
    options: GenerateOptions,
}

impl Settings {
    fn resolve(cli: &Cli, config: Config) -> Self {
        let Config {
            store,
            generate,
            grammar,
        } = config;
        let dbname = cli.dbname.clone().unwrap_or(store.dbname);
        Self {
            hostname: cli.hostname.clone().unwrap_or(store.hostname),
            port: cli.port.unwrap_or(store.port),
            data_dir: cli.data_dir.clone().or(generate.data_dir),
            options: GenerateOptions {
                encoding: cli.encoding.map(TextEncoding::from).unwrap_or(generate.encoding),
                preserve_database: cli.preserve_database || generate.preserve_database,
                database: dbname.clone(),
                seed: cli.seed.or(generate.seed),
                grammar,
            },
            dbname,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tokio::select! {
        result = run(cli) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nCancelled!\n");
            ExitCode::SUCCESS
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if cli.create_sample {
        print!("{SAMPLE_TEMPLATE}");
        return Ok(());
    }

    init_logging(cli.verbose, cli.log_json.as_deref())?;

    let config = Config::discover(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, config);
    let template_path = cli.template.as_deref().ok_or(CliError::MissingTemplate)?;

    let assets = match &settings.data_dir {
        Some(dir) => AssetSource::new(dir),
        None => AssetSource::bundled(),
    };
    let dictionaries = DictionarySet::load(&assets)?;
    let validated = load_template(template_path, &dictionaries.ids())?;
    for warning in &validated.warnings {
        tracing::warn!(event = "template_warning", code = %warning.code, path = %warning.path, "{}", warning.message);
    }
    tracing::info!(
        event = "template_loaded",
        path = %template_path.display(),
        collections = validated.template.collections.len(),
        documents = validated.template.total_documents()
    );

    if cli.check {
        println!(
            "template '{}' is valid: {} collections, {} documents, {} warnings",
            template_path.display(),
            validated.template.collections.len(),
            validated.template.total_documents(),
            validated.warnings.len()
        );
        return Ok(());
    }

    let generator = Generator::new(&dictionaries, settings.options.clone())?;

    let mut sink: Box<dyn OutputSink> = if cli.test_output {
        let sink = TraceSink::stdout();
        match settings.options.seed {
            Some(seed) => Box::new(sink.with_id_seed(seed)),
            None => Box::new(sink),
        }
    } else {
        Box::new(MongoSink::connect(&settings.hostname, settings.port, &settings.dbname).await?)
    };

    let mut progress: Box<dyn ProgressReporter> = if cli.no_progress {
        Box::new(NoProgress)
    } else {
        Box::new(StderrProgress::new())
    };

    eprintln!("datagen - Version {}\n", env!("CARGO_PKG_VERSION"));
    eprintln!("Starting data generation.");
    let started = Instant::now();

    let report = generator
        .run(&validated.template, sink.as_mut(), progress.as_mut())
        .await?;

    eprintln!(
        "\nData generation complete in {:.6} seconds",
        started.elapsed().as_secs_f64()
    );

    if let Some(path) = &cli.report {
        let encoded = serde_json::to_vec_pretty(&report)?;
        std::fs::write(path, encoded).map_err(|source| CliError::Report {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(event = "report_written", path = %path.display());
    }

    Ok(())
}
