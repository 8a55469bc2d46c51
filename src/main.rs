use anyhow::{Context, Result};
use clap::Parser;
use qfar::{AccessTimePolicy, RewriteConfig, RewriteRequest, batch, report};
use std::path::PathBuf;
use std::process::ExitCode;

/// Bulk find and replace for QGIS project files (.qgs / .qgz)
///
/// Every literal occurrence of FIND is replaced, so check a copy of your
/// projects first.
#[derive(Parser, Debug)]
#[command(name = "qfar", version, about)]
struct Cli {
    /// Starting directory
    root: PathBuf,

    /// Text to search for
    #[arg(short, long)]
    find: String,

    /// Replacement text (may be empty)
    #[arg(short, long, default_value = "")]
    replace: String,

    /// Do not search subdirectories
    #[arg(long)]
    no_recursive: bool,

    /// Do not keep a hidden copy of each original
    #[arg(long)]
    no_archive: bool,

    /// Keep each file's previous access time instead of stamping "now"
    #[arg(long)]
    preserve_atime: bool,

    /// Files to process concurrently
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Log every file
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let request = RewriteRequest::new(cli.find, cli.replace).context("Invalid input")?;

    let atime_policy = if cli.preserve_atime {
        AccessTimePolicy::Preserve
    } else {
        AccessTimePolicy::CaptureInstant
    };

    let config = RewriteConfig::builder(cli.root, request)
        .recursive(!cli.no_recursive)
        .archive(!cli.no_archive)
        .atime_policy(atime_policy)
        .jobs(cli.jobs)
        .build();

    let result = batch::run(&config).context("Nothing was changed")?;

    if cli.json {
        println!("{}", report::render_json(&config, &result)?);
    } else {
        print!("{}", report::render_text(&result));
    }

    Ok(if result.has_failures() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
