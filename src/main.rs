use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use log::info;

use span_extract::config::ExtractConfig;
use span_extract::event_key::compute_event_key;
use span_extract::pipeline;
use span_extract::span::SourceFamily;

const OUTPUT_DIR: &str = "output";

#[derive(Parser)]
#[command(
    name = "span_extract",
    about = "Historical date and span extractor"
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter, e.g. "debug" (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract events from every source document under a directory
    Extract {
        /// Directory of source document JSON files
        input: PathBuf,
        /// Where bundles and summary.json are written
        #[arg(long, default_value = OUTPUT_DIR)]
        output: PathBuf,
    },
    /// Resolve one date fragment and print the span
    Parse {
        /// Fragment, e.g. "Early 2nd century BC", "(Between 753 and 716 BC)"
        text: Vec<String>,
        /// bullet, table or heading
        #[arg(long, default_value = "bullet")]
        family: SourceFamily,
        /// Anchor for "years ago"
        #[arg(long)]
        reference_year: Option<u64>,
        /// Read bare years as BC
        #[arg(long)]
        assume_bc: bool,
    },
    /// Print the event key for a title and year range (negative = BC)
    Key {
        #[arg(long)]
        title: String,
        #[arg(long, allow_hyphen_values = true)]
        start: i64,
        #[arg(long, allow_hyphen_values = true)]
        end: i64,
        #[arg(long)]
        description: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    // The handle must live until exit or buffered records are lost.
    let _logger = match flexi_logger::Logger::try_with_env_or_str(&cli.log_level)
        .and_then(|logger| logger.start())
    {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Cannot start logger: {e}");
            None
        }
    };

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Command::Extract { input, output } => run_extract(&input, &output, &config),
        Command::Parse {
            text,
            family,
            reference_year,
            assume_bc,
        } => run_parse(&text.join(" "), family, reference_year, assume_bc, &config),
        Command::Key {
            title,
            start,
            end,
            description,
        } => println!(
            "{}",
            compute_event_key(&title, start, end, description.as_deref())
        ),
    }
}

fn load_config(path: Option<&Path>) -> ExtractConfig {
    ExtractConfig::load(path).unwrap_or_else(|e| {
        eprintln!("Cannot load configuration: {e}");
        std::process::exit(2);
    })
}

// ═══════════════════════════════════════════════════════════════════════
//  EXTRACT MODE: directory of documents → output/*.events.json
// ═══════════════════════════════════════════════════════════════════════

fn run_id() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("run-{secs}")
}

fn run_extract(input: &Path, output: &Path, config: &ExtractConfig) {
    let run_id = run_id();
    info!("[{run_id}] scanning {}", input.display());

    let report = pipeline::run_directory(input, output, config, &run_id).unwrap_or_else(|e| {
        eprintln!("Extraction failed: {e}");
        std::process::exit(1);
    });

    // ── Print statistics ───────────────────────────────────────────
    eprintln!("\n══════════════════════════════════════════");
    eprintln!("  RUN SUMMARY ({run_id})");
    eprintln!("══════════════════════════════════════════");
    eprintln!("  Documents written: {}", report.written.len());
    eprintln!("  Events extracted:  {}", report.summary.events_extracted);
    eprintln!("  Skipped items:     {}", report.summary.skipped_rows);
    eprintln!("\nBy confidence:");
    for (tier, count) in &report.summary.confidence_distribution {
        eprintln!("  {:<12} {count}", tier.as_str());
    }

    if !report.failed.is_empty() {
        eprintln!("\n══════════════════════════════════════════");
        eprintln!("  UNREADABLE DOCUMENTS ({} total)", report.failed.len());
        eprintln!("══════════════════════════════════════════");
        for (path, reason) in report.failed.iter().take(30) {
            eprintln!("  {}: {reason}", path.display());
        }
        if report.failed.len() > 30 {
            eprintln!("  ... and {} more", report.failed.len() - 30);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  PARSE MODE: one fragment → span JSON on stdout
// ═══════════════════════════════════════════════════════════════════════

fn run_parse(
    text: &str,
    family: SourceFamily,
    reference_year: Option<u64>,
    assume_bc: bool,
    config: &ExtractConfig,
) {
    let orchestrator = config.orchestrator().unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(2);
    });
    let mut ctx = config
        .parse_context(family)
        .with_assumed_era(assume_bc.then_some(true));
    if let Some(year) = reference_year {
        ctx = ctx.with_reference_year(year);
    }

    match orchestrator.parse(text, &ctx) {
        Ok(Some(span)) => match serde_json::to_string_pretty(&span) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Cannot serialize span: {e}"),
        },
        Ok(None) => {
            eprintln!("no match: {text:?}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
