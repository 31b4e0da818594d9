use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use exb_validate::{
    format_rule_catalogue, locate_original, parse_exb_file, select_original, ContainmentStrategy,
    HumanReport, MachineReport, RunStatus, TracingSink, Validator, ValidatorConfig,
};

#[derive(Parser)]
#[command(name = "exb-validate")]
#[command(author, version, about = "Consistency checks for disfluency-annotated EXB transcriptions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an annotated transcription against its original
    Validate {
        /// Annotated transcription (EXB XML)
        #[arg(short, long)]
        input: PathBuf,

        /// Original transcription; searched for in --originals-dir when omitted
        #[arg(short, long)]
        original: Option<PathBuf>,

        /// Directory holding candidate originals (defaults to $EXB_ORIGINALS_DIR)
        #[arg(long)]
        originals_dir: Option<PathBuf>,

        /// Require disfluencyStructure boundaries to coincide with verbalDisfluency boundaries
        #[arg(long)]
        strict_containment: bool,

        /// Also write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the rules that are checked
    Rules,

    /// Summarize the speakers, timeline and tiers of a transcription
    Inspect {
        /// Transcription file (EXB XML)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            input,
            original,
            originals_dir,
            strict_containment,
            json,
            verbose,
        } => {
            setup_logging(verbose);
            let mut config = ValidatorConfig::from_env();
            if originals_dir.is_some() {
                config.originals_dir = originals_dir;
            }
            if strict_containment {
                config.containment = ContainmentStrategy::Strict;
            }
            validate(&input, original, json.as_deref(), &config).await
        }
        Commands::Rules => {
            print!("{}", format_rule_catalogue());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Inspect { input, verbose } => {
            setup_logging(verbose);
            inspect(&input)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// RUST_LOG takes precedence over --verbose
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn validate(
    input: &Path,
    original: Option<PathBuf>,
    json: Option<&Path>,
    config: &ValidatorConfig,
) -> Result<ExitCode> {
    info!("Loading annotated transcription from {:?}", input);
    let annotated = parse_exb_file(input).context("Failed to parse annotated transcription")?;

    let original_path = match original {
        Some(path) => path,
        None => {
            let dir = config.originals_dir.as_deref().context(
                "No original given: pass --original, --originals-dir or set EXB_ORIGINALS_DIR",
            )?;
            let candidates = locate_original(&annotated, dir, &config.candidate_suffix).await?;
            match select_original(candidates) {
                Ok(path) => path,
                Err(err) => {
                    error!("{}", err);
                    return Ok(ExitCode::from(2));
                }
            }
        }
    };

    info!("Found the original file for this annotation: {:?}", original_path);
    let original =
        parse_exb_file(&original_path).context("Failed to parse original transcription")?;

    let mut sink = TracingSink;
    let report = Validator::new(config.containment, &mut sink).run(&annotated, &original);

    print!("{}", HumanReport::new(&report).format());

    if let Some(path) = json {
        MachineReport::new(&report, input, &original_path).write_json(path)?;
        info!("JSON report written to {:?}", path);
    }

    Ok(match report.status() {
        RunStatus::AllPassed => ExitCode::SUCCESS,
        RunStatus::SomeFailed => ExitCode::from(1),
    })
}

fn inspect(input: &Path) -> Result<()> {
    info!("Inspecting transcription from {:?}", input);
    let doc = parse_exb_file(input).context("Failed to parse transcription")?;

    println!("Transcription Summary");
    println!("=====================");
    let speakers: Vec<&str> = doc.speakers().into_iter().collect();
    println!("Speakers: {}", speakers.join(", "));
    match &doc.timeline {
        Some(timeline) => println!("Timeline markers: {}", timeline.len()),
        None => println!("Timeline markers: none (no common timeline)"),
    }
    println!();

    println!("Tiers");
    println!("-----");
    for tier in &doc.tiers {
        println!(
            "{} '{}' speaker={} category={} events={}",
            tier.id,
            tier.display_name,
            tier.speaker.as_deref().unwrap_or("-"),
            tier.category,
            tier.events.len()
        );
    }

    Ok(())
}
