use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use steward::catalog;
use steward::config::{CONFIG_FILE, ProjectConfig};
use steward::dictionary::{self, Registry};
use steward::expectations::{self, DEFAULT_SUITE_NAME};
use steward::naming;
use steward::quality::{self, FileReport, Report};

#[derive(Parser)]
#[command(name = "steward", about = "Schema registry and data quality gating for research data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a fresh project configuration file
    Init {
        /// Path of the configuration file to create
        #[arg(long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// Reconcile the schema registry with the data files on disk
    Sync {
        /// Path to the project configuration file
        #[arg(long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Registry path (.json or .csv). Defaults to the configured path.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Validate data files against the schema registry
    Check {
        /// Path to the project configuration file
        #[arg(long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Registry snapshot to validate against. Defaults to the configured path.
        #[arg(short, long)]
        dictionary: Option<PathBuf>,

        /// Print the report as JSON instead of per-finding lines
        #[arg(long)]
        json: bool,
    },
    /// Check data file names against the naming convention
    Naming {
        /// Path to the project configuration file
        #[arg(long, default_value = CONFIG_FILE)]
        config: PathBuf,
    },
    /// Export one tracked file's declared columns as an expectation suite
    Expectations {
        /// Path to the project configuration file
        #[arg(long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Registry snapshot to read. Defaults to the configured path.
        #[arg(short, long)]
        dictionary: Option<PathBuf>,

        /// File name (registry key) whose columns to export
        #[arg(short, long)]
        file: String,

        /// Output path for the suite JSON
        #[arg(short, long)]
        out: PathBuf,

        /// Name recorded in the suite
        #[arg(long, default_value = DEFAULT_SUITE_NAME)]
        suite_name: String,
    },
    /// Generate deposit metadata JSON from a field,value CSV
    Catalog {
        /// Metadata CSV (written as a starter template if it does not exist)
        #[arg(long)]
        csv: PathBuf,

        /// Output path for the deposit JSON
        #[arg(short, long)]
        out: PathBuf,
    },
}

pub fn run_command(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Init { config, force } => handle_init(&config, force),
        Commands::Sync { config, out } => handle_sync(&config, out),
        Commands::Check {
            config,
            dictionary,
            json,
        } => handle_check(&config, dictionary, json),
        Commands::Naming { config } => handle_naming(&config),
        Commands::Expectations {
            config,
            dictionary,
            file,
            out,
            suite_name,
        } => handle_expectations(&config, dictionary, &file, &out, &suite_name),
        Commands::Catalog { csv, out } => handle_catalog(&csv, &out),
    }
}

fn handle_init(config_path: &Path, force: bool) -> Result<ExitCode> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (pass --force to overwrite it)",
            config_path.display()
        );
    }
    ProjectConfig::default().save(config_path)?;
    println!("Project config written to {}", config_path.display());
    println!("Edit the data directory and naming convention to fit your project.");
    Ok(ExitCode::SUCCESS)
}

fn handle_sync(config_path: &Path, out: Option<PathBuf>) -> Result<ExitCode> {
    let config = ProjectConfig::load(config_path)?;
    let out_path = out.unwrap_or_else(|| PathBuf::from(&config.dictionary_path));

    let mut registry = if out_path.exists() {
        dictionary::load_registry(&out_path)?
    } else {
        Registry::new()
    };

    let data_root = PathBuf::from(&config.data_directory_name);
    println!("Synchronizing registry with {}...", data_root.display());
    let summary = dictionary::synchronize(&data_root, &mut registry);
    dictionary::save_registry(&registry, &out_path)?;

    println!(
        "Scanned {} files: {} new entries, {} columns added, {} columns dropped.",
        summary.files_seen, summary.entries_created, summary.columns_added, summary.columns_dropped
    );
    println!("Registry written to {}", out_path.display());
    Ok(ExitCode::SUCCESS)
}

fn handle_check(config_path: &Path, dictionary: Option<PathBuf>, json: bool) -> Result<ExitCode> {
    let config = ProjectConfig::load(config_path)?;
    let dictionary_path = dictionary.unwrap_or_else(|| PathBuf::from(&config.dictionary_path));
    let registry = dictionary::load_registry(&dictionary_path)?;

    let report = quality::validate(Path::new("."), &registry);

    if json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to render report as JSON")?;
        println!("{rendered}");
    } else if report.is_empty() {
        println!("All {} tracked files passed quality checks.", registry.len());
    } else {
        print_report(&report);
    }

    if report.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn print_report(report: &Report) {
    for (file_name, file_report) in report.files() {
        match file_report {
            FileReport::Error { message } => println!("{file_name}: {message}"),
            FileReport::Issues {
                file_issues,
                column_issues,
            } => {
                for issue in file_issues {
                    println!("{file_name}: {issue}");
                }
                for (column, issues) in column_issues {
                    for issue in issues {
                        println!("{file_name}: {column}: {issue}");
                    }
                }
            }
        }
    }
}

fn handle_naming(config_path: &Path) -> Result<ExitCode> {
    let config = ProjectConfig::load(config_path)?;
    let data_root = PathBuf::from(&config.data_directory_name);
    let non_compliant =
        naming::non_compliant_files(&data_root, &config.data_naming_convention_regex)?;

    if non_compliant.is_empty() {
        println!("All files are compliant.");
        return Ok(ExitCode::SUCCESS);
    }
    println!("Non-compliant files:");
    for path in &non_compliant {
        println!("{}", path.display());
    }
    Ok(ExitCode::from(1))
}

fn handle_expectations(
    config_path: &Path,
    dictionary: Option<PathBuf>,
    file: &str,
    out: &Path,
    suite_name: &str,
) -> Result<ExitCode> {
    let config = ProjectConfig::load(config_path)?;
    let dictionary_path = dictionary.unwrap_or_else(|| PathBuf::from(&config.dictionary_path));
    let registry = dictionary::load_registry(&dictionary_path)?;

    let Some(entry) = registry.get(file) else {
        bail!("File '{file}' is not tracked in {}", dictionary_path.display());
    };
    expectations::write_suite(entry, suite_name, out)?;
    println!("Expectation suite '{suite_name}' for {file} written to {}", out.display());
    Ok(ExitCode::SUCCESS)
}

fn handle_catalog(csv: &Path, out: &Path) -> Result<ExitCode> {
    if !csv.exists() {
        catalog::write_template(csv)?;
        println!(
            "Metadata template written to {}. Fill it in and rerun.",
            csv.display()
        );
        return Ok(ExitCode::SUCCESS);
    }
    catalog::generate_deposit(csv, out)?;
    println!("Deposit metadata written to {}", out.display());
    Ok(ExitCode::SUCCESS)
}
