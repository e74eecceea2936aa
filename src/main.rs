//! CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use lexicat::config::AppConfig;
use lexicat::reconcile::TranslationUpdate;
use lexicat::registry::default_registry;
use lexicat::Reconciler;

#[derive(Parser)]
#[command(name = "lexicat", version, about = "Catalog metadata scraper and translation manager")]
struct Cli {
    /// Configuration file (defaults to the standard search paths).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape one module, or every registered module.
    Scrape {
        /// Module name; all modules when omitted.
        module: Option<String>,
    },
    /// Show completion statistics for a module.
    Stats { module: String },
    /// Dump aggregated translation rows for a module.
    Data { module: String },
    /// Set a single translation value.
    Set {
        module: String,
        key: String,
        lang: String,
        value: String,
        /// Keep the entry marked untranslated.
        #[arg(long)]
        untranslated: bool,
    },
    /// List registered modules.
    Modules,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> lexicat::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };
    config.validate()?;
    let registry = default_registry(&config)?;
    let reconciler = Reconciler::new(config, registry);

    match cli.command {
        Command::Scrape {
            module: Some(module),
        } => {
            let outcome = reconciler.reconcile_module(&module)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(if outcome.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Scrape { module: None } => {
            let batch = reconciler.reconcile_all();
            println!("{}", serde_json::to_string_pretty(&batch)?);
            if batch.failed_modules > 0 {
                let failed: Vec<&str> = batch
                    .results
                    .iter()
                    .filter(|r| !r.success)
                    .map(|r| r.module_name.as_str())
                    .collect();
                eprintln!("failed modules (retry individually): {}", failed.join(", "));
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Stats { module } => {
            let stats = reconciler.module_stats(&module)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Data { module } => {
            let rows = reconciler.module_data(&module)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Set {
            module,
            key,
            lang,
            value,
            untranslated,
        } => {
            reconciler.update_translation(
                &module,
                TranslationUpdate {
                    key,
                    lang,
                    value,
                    translated: untranslated.then_some(false),
                },
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Modules => {
            for module in reconciler.registry().iter() {
                println!("{}\t{}", module.name, module.description);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
