mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "aqualert",
    version,
    about = "Water-quality classification and alerting for village water sources"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify submitted water-quality report(s) and decide on alerts
    Assess {
        /// JSON file with one report or an array of reports
        input_file: PathBuf,

        /// Directory of villages, water bodies and worker assignments (JSON)
        #[arg(short, long, value_name = "FILE")]
        directory: PathBuf,

        /// Custom threshold table (JSON). Default: $AQUALERT_THRESHOLDS or built-in
        #[arg(short, long, value_name = "FILE")]
        thresholds: Option<PathBuf>,

        /// Submitting worker; rejected unless assigned to the water body
        #[arg(short, long, value_name = "ID")]
        worker: Option<i64>,

        /// Scorer base URL. Default: $AQUALERT_SCORER_URL or http://localhost:8000
        #[arg(long, value_name = "URL")]
        scorer_url: Option<String>,

        /// Do not consult the external scorer
        #[arg(long)]
        no_scorer: bool,

        /// Scorer timeout in milliseconds (at most 5000)
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,

        /// Alert recipients. Default: $AQUALERT_ALERT_AUDIENCE or "Village authorities"
        #[arg(long)]
        audience: Option<String>,

        /// Submission date (YYYY-MM-DD) used for reports without a date. Default: today
        #[arg(long)]
        date: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Show the current water status of a village's water bodies
    Status {
        /// JSON array of submitted reports
        samples_file: PathBuf,

        /// Directory of villages and water bodies (JSON)
        #[arg(short, long, value_name = "FILE")]
        directory: PathBuf,

        /// Village to summarize
        #[arg(long, value_name = "ID")]
        village: i64,

        /// Custom threshold table (JSON)
        #[arg(short, long, value_name = "FILE")]
        thresholds: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate threshold tables
    Thresholds {
        #[command(subcommand)]
        action: ThresholdsAction,
    },
}

#[derive(Subcommand)]
enum ThresholdsAction {
    /// List predefined threshold tables
    List,
    /// Explain a threshold table in plain language
    Explain {
        /// Preset name (e.g., "village")
        preset: String,

        /// Only explain the rule for this contaminant (e.g., "arsenic")
        #[arg(short, long)]
        contaminant: Option<String>,
    },
    /// Print the JSON format of a threshold table
    Schema,
    /// Validate a custom threshold table
    Validate {
        /// Path to JSON threshold table
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Assess {
            input_file,
            directory,
            thresholds,
            worker,
            scorer_url,
            no_scorer,
            timeout_ms,
            audience,
            date,
            output,
        } => commands::assess::run(commands::assess::AssessArgs {
            input_file,
            directory,
            thresholds,
            worker,
            scorer_url,
            no_scorer,
            timeout_ms,
            audience,
            date,
            output,
        }),
        Commands::Status {
            samples_file,
            directory,
            village,
            thresholds,
            output,
        } => commands::status::run(samples_file, directory, village, thresholds, &output),
        Commands::Thresholds { action } => match action {
            ThresholdsAction::List => commands::thresholds::list(),
            ThresholdsAction::Explain {
                preset,
                contaminant,
            } => commands::thresholds::explain(&preset, contaminant.as_deref()),
            ThresholdsAction::Schema => commands::thresholds::schema(),
            ThresholdsAction::Validate { file } => commands::thresholds::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
