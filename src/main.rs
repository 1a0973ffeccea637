use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chemequip::config::AppConfig;
use chemequip::database::{open_database, seed_data};
use chemequip::errors::IngestError;
use chemequip::ingest;
use chemequip::services::{DatasetService, ReportFormat, ReportService};
use chemequip::{common, server};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// YAML configuration file
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long)]
        database: Option<String>,
        #[clap(long)]
        cors_origin: Option<String>,
        #[clap(long)]
        max_datasets: Option<usize>,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    /// Validate, aggregate and store a CSV file
    Ingest {
        file: PathBuf,
        #[clap(short, long)]
        database: Option<String>,
        #[clap(long)]
        max_datasets: Option<usize>,
    },
    /// Validate and aggregate a CSV file without storing it
    Inspect { file: PathBuf },
    /// Render a stored dataset as Markdown or CSV
    Report {
        id: i32,
        #[clap(short, long, default_value = "markdown")]
        format: ReportFormat,
        /// Write to this file instead of stdout
        #[clap(short, long)]
        output: Option<String>,
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init {
        #[clap(short, long)]
        database: Option<String>,
    },
    Migrate {
        #[clap(subcommand)]
        direction: server::MigrateDirection,
        #[clap(short, long)]
        database: Option<String>,
    },
    /// Store the bundled sample dataset
    Seed {
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let mut config = AppConfig::load_or_default(args.config.as_deref())?;

    match args.command {
        Commands::Serve {
            port,
            database,
            cors_origin,
            max_datasets,
        } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(database) = database {
                config.database = database;
            }
            if cors_origin.is_some() {
                config.cors_origin = cors_origin;
            }
            if let Some(max_datasets) = max_datasets {
                config.max_datasets = max_datasets;
            }
            info!("Starting server on port {}", config.port);
            server::start_server(config).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database } => {
                let database = database.unwrap_or(config.database);
                info!("Initializing database: {}", database);
                server::migrate_database(&database, server::MigrateDirection::Up).await?;
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                let database = database.unwrap_or(config.database);
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&database, direction).await?;
            }
            DbCommands::Seed { database } => {
                let database = database.unwrap_or(config.database);
                let db = open_database(&database).await?;
                let service = DatasetService::new(db.clone(), config.max_datasets);
                seed_data::seed_sample_dataset(&service, &db).await?;
            }
        },
        Commands::Ingest {
            file,
            database,
            max_datasets,
        } => {
            let database = database.unwrap_or(config.database);
            let max_datasets = max_datasets.unwrap_or(config.max_datasets);
            ingest_file(&file, &database, max_datasets).await?;
        }
        Commands::Inspect { file } => inspect_file(&file)?,
        Commands::Report {
            id,
            format,
            output,
            database,
        } => {
            let database = database.unwrap_or(config.database);
            let db = open_database(&database).await?;
            let service = ReportService::new(DatasetService::new(db, config.max_datasets));
            let report = service.render(id, format).await?;
            match output {
                Some(path) => {
                    common::write_string_to_file(&path, &report.body)
                        .with_context(|| format!("Failed to write report to {}", path))?;
                    info!("Wrote {} report to {}", format, path);
                }
                None => print!("{}", report.body),
            }
        }
    }

    Ok(())
}

fn read_upload(file: &Path) -> Result<(String, Vec<u8>)> {
    let raw = std::fs::read(file).map_err(IngestError::from)?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".to_string());
    Ok((filename, raw))
}

async fn ingest_file(file: &Path, database: &str, max_datasets: usize) -> Result<()> {
    let (filename, raw) = read_upload(file)?;
    let db = open_database(database).await?;
    let service = DatasetService::new(db, max_datasets);

    match service.ingest(&filename, &raw).await {
        Ok(outcome) => {
            println!(
                "{} dataset {} from {} ({} records)",
                "Stored".green().bold(),
                outcome.dataset.id,
                outcome.dataset.filename,
                outcome.dataset.total_equipment_count
            );
            if !outcome.evicted.is_empty() {
                println!("{} {:?}", "Evicted".yellow(), outcome.evicted);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{} [{}] {}", "Rejected".red().bold(), err.error_code(), err);
            Err(err.into())
        }
    }
}

fn inspect_file(file: &Path) -> Result<()> {
    let (filename, raw) = read_upload(file)?;

    let analysis = match ingest::analyze(&raw) {
        Ok(analysis) => analysis,
        Err(err) => {
            eprintln!("{} [{}] {}", "Invalid".red().bold(), err.error_code(), err);
            return Err(err.into());
        }
    };

    let stats = &analysis.aggregate.dataset;
    let show = |value: Option<f64>| value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "n/a".to_string());

    println!("{} {}", "File:".bold(), filename);
    println!("{} {}", "Fingerprint:".bold(), ingest::fingerprint(&raw));
    println!("{} {}", "Records:".bold(), stats.total_count);
    println!("{} {}", "Avg flowrate:".bold(), show(stats.avg_flowrate()));
    println!("{} {}", "Avg pressure:".bold(), show(stats.avg_pressure()));
    println!("{} {}", "Avg temperature:".bold(), show(stats.avg_temperature()));
    println!("{}", "Types:".bold());
    for summary in analysis.aggregate.types.values() {
        println!(
            "  {:<28} {:>5}  flow {:.2} [{:.2}, {:.2}]",
            summary.equipment_type.cyan(),
            summary.count,
            summary.flowrate.mean,
            summary.flowrate.min,
            summary.flowrate.max
        );
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
