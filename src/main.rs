use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sotdl_import::config::AppConfig;
use sotdl_import::core::logging;
use sotdl_import::core::sink::{create_records, JsonLinesSink, RecordSink};
use sotdl_import::ingestion::ttrpg::{run_import, ContentKind, ImportOutcome};

/// Import Shadow of the Demon Lord text as demonlord records.
///
/// Reads pasted text from a file or stdin and writes one JSON record per
/// line to stdout or `--output`. A summary goes to stderr.
#[derive(Parser, Debug)]
#[command(name = "sotdl-import", version, about)]
struct Cli {
    /// Kind of content in the input
    #[arg(short, long, value_enum)]
    kind: Option<ContentKind>,

    /// Input file (defaults to stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Keep leading tradition words in creature spell lists
    #[arg(long)]
    no_clean_traditions: bool,

    /// Destination folder id attached to each record
    #[arg(long)]
    folder: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to ~/.config/sotdl-import/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };

    if let Err(e) = logging::init(&config.logging.level) {
        eprintln!("Failed to initialize logging: {e}");
    }
    log::info!("{} v{} starting", sotdl_import::NAME, sotdl_import::VERSION);

    let text = read_input(cli.input.as_ref())?;
    let kind = cli.kind.unwrap_or(config.import.default_kind);
    let options = config.import_options(cli.no_clean_traditions);

    let outcome = run_import(kind, &text, options);
    print_summary(&outcome);
    if let Some(error) = &outcome.error {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }

    let folder = cli.folder.as_deref().or(config.output.folder.as_deref());
    let mut sink: Box<dyn RecordSink> = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(JsonLinesSink::new(BufWriter::new(file), config.output.pretty))
        }
        None => Box::new(JsonLinesSink::new(io::stdout().lock(), config.output.pretty)),
    };

    let results = create_records(&mut sink, &outcome.records, folder);
    let failed = results.iter().filter(|r| !r.created).count();
    if failed > 0 {
        eprintln!("{failed} of {} record(s) could not be written", results.len());
        std::process::exit(1);
    }

    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn print_summary(outcome: &ImportOutcome) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(
        stderr,
        "{} import: {} record(s), {} skipped",
        outcome.kind,
        outcome.records.len(),
        outcome.errors.len()
    );
    for error in &outcome.errors {
        let _ = writeln!(stderr, "  skipped {error}");
    }
}
