//! Learnerload CLI - validate bulk learner registration CSV files
//!
//! # Main Commands
//!
//! ```bash
//! learnerload serve                      # Start HTTP server (port 3000)
//! learnerload validate learners.csv     # Validate and convert a batch
//! learnerload template -o template.csv  # Write the blank upload template
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! learnerload normalize learners.csv    # Show the normalized CSV text
//! learnerload check records.json        # Check exported records against the schema
//! ```

use clap::{Parser, Subcommand};
use learnerload::{
    api::logs::LOG_BROADCASTER, read_csv_file, template_csv, validate_file,
    validate_learner_records, ServerConfig, ValidationResponse,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "learnerload")]
#[command(about = "Validate bulk learner registration CSV files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a CSV batch and print the result as JSON
    Validate {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print only the converted records
        #[arg(long)]
        records_only: bool,

        /// Hide pipeline progress
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the CSV text after line normalization
    Normalize {
        /// Input CSV file
        input: PathBuf,
    },

    /// Write the blank upload template
    Template {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check exported records (JSON array) against the record schema
    Check {
        /// Input JSON file
        input: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: LEARNERLOAD_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Maximum upload size in MB (default: LEARNERLOAD_MAX_UPLOAD_MB or 5)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        max_upload_mb: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            input,
            output,
            records_only,
            quiet,
        } => cmd_validate(&input, output.as_deref(), records_only, quiet),

        Commands::Normalize { input } => cmd_normalize(&input),

        Commands::Template { output } => cmd_template(output.as_deref()),

        Commands::Check { input } => cmd_check(&input),

        Commands::Serve { port, max_upload_mb } => cmd_serve(port, max_upload_mb).await,
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(2);
        }
    }
}

type CmdResult = Result<bool, Box<dyn std::error::Error>>;

fn cmd_validate(input: &Path, output: Option<&Path>, records_only: bool, quiet: bool) -> CmdResult {
    if quiet {
        LOG_BROADCASTER.set_echo(false);
    }
    eprintln!("📄 Validating: {}", input.display());

    let outcome = validate_file(input)?;
    let response = ValidationResponse::from(outcome);

    if response.is_valid {
        eprintln!("✅ {} learner records valid", response.data.len());
    } else {
        eprintln!("❌ {}", response.error_message);
    }

    let json = if records_only {
        serde_json::to_string_pretty(&response.data)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    write_output(&json, output)?;

    Ok(response.is_valid)
}

fn cmd_normalize(input: &Path) -> CmdResult {
    let text = read_csv_file(input)?;
    let normalized = learnerload::normalize(&text);
    eprintln!(
        "📄 {} lines after normalization",
        normalized.lf_lines().filter(|l| !l.is_empty()).count()
    );
    println!("{}", normalized);
    Ok(true)
}

fn cmd_template(output: Option<&Path>) -> CmdResult {
    let content = template_csv()?;
    match output {
        Some(p) => {
            fs::write(p, &content)?;
            eprintln!("💾 Template written to: {}", p.display());
        }
        None => print!("{}", content),
    }
    Ok(true)
}

fn cmd_check(input: &Path) -> CmdResult {
    eprintln!("✔️  Checking: {}", input.display());

    let content = fs::read_to_string(input)?;
    let records: Value = serde_json::from_str(&content)?;
    let total = records.as_array().map_or(0, Vec::len);

    match validate_learner_records(&records) {
        Ok(()) => {
            eprintln!("✅ All {} records valid", total);
            Ok(true)
        }
        Err(failures) => {
            for (i, errors) in failures.iter().take(5) {
                eprintln!("\n❌ Record {} invalid:", i);
                for err in errors.iter().take(3) {
                    eprintln!("   - {}", err);
                }
            }
            eprintln!("\n📊 Results: {} valid, {} invalid", total.saturating_sub(failures.len()), failures.len());
            Ok(false)
        }
    }
}

async fn cmd_serve(port: Option<u16>, max_upload_mb: Option<u64>) -> CmdResult {
    let max_upload_mb = max_upload_mb.map(|mb| usize::try_from(mb).unwrap_or(usize::MAX));
    let config = ServerConfig::from_env().with_overrides(port, max_upload_mb);
    learnerload::server::start_server(config).await?;
    Ok(true)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
