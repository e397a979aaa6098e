//! mssql-script-export CLI - export SQL Server table data as INSERT scripts.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mssql_script_export::{Config, ExportError, Exporter};
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "mssql-script-export")]
#[command(about = "Export SQL Server table data as replayable INSERT scripts")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate INSERT scripts for the configured tables
    Run {
        /// Override the configured output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Emit TRUNCATE TABLE preambles, overriding the config
        #[arg(long)]
        truncate: bool,

        /// Dry run: fetch and assemble without writing scripts
        #[arg(long)]
        dry_run: bool,
    },

    /// Test the source database connection
    HealthCheck,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), ExportError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format)
        .map_err(|e| ExportError::Config(e.to_string()))?;

    let mut config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    // Ctrl-C finishes the current table, then stops the run
    let cancel = setup_signal_handler();

    match cli.command {
        Commands::Run {
            output_dir,
            truncate,
            dry_run,
        } => {
            // Apply overrides
            if let Some(dir) = output_dir {
                config.export.output_dir = dir;
            }
            if truncate {
                config.export.truncate_before_insert = true;
            }

            let exporter = Exporter::new(config).await?;
            let result = exporter.run(cancel, dry_run).await?;

            if cli.output_json {
                println!("{}", result.to_json()?);
            } else {
                let status_msg = if dry_run {
                    "Dry run completed!"
                } else {
                    "Export completed!"
                };
                println!("\n{}", status_msg);
                println!("  Run ID: {}", result.run_id);
                println!("  Duration: {:.2}s", result.duration_seconds);
                println!("  Tables: {}/{}", result.tables_success, result.tables_total);
                println!("  Rows scripted: {}", result.rows_scripted);
                if result.tables_empty > 0 {
                    println!("  Empty tables (no script): {}", result.tables_empty);
                }
                if !result.failed_tables.is_empty() {
                    println!("  Failed tables: {:?}", result.failed_tables);
                }
            }
        }

        Commands::HealthCheck => {
            let exporter = Exporter::new(config).await?;
            exporter.health_check().await?;
            println!("Source connection OK");
        }
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbosity {
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current table");
            child.cancel();
        }
    });

    token
}
