//! LiftLog - strength training progression tracker
//!
//! Main entry point for the application.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use liftlog::storage::config::{get_data_dir, load_config, save_config};
use liftlog::storage::{open_store, AppConfig, StorageBackend};
use liftlog::ui::{Prompter, Theme};
use liftlog::App;

/// Track a two-workout barbell program from the terminal.
#[derive(Debug, Parser)]
#[command(name = "liftlog", version, about)]
struct Args {
    /// Directory holding settings, weights and workout history
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Program definition file (YAML)
    #[arg(long)]
    program: Option<PathBuf>,

    /// Storage backend, overriding settings.toml
    #[arg(long, value_enum)]
    backend: Option<StorageBackend>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(get_data_dir);

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("Error: cannot create {}: {}", data_dir.display(), e);
        return ExitCode::from(1);
    }

    let mut config = match load_config(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting LiftLog v{}", env!("CARGO_PKG_VERSION"));

    if !config.settings_path().exists() {
        if let Err(e) = save_config(&config) {
            tracing::warn!("Could not write default settings: {}", e);
        }
    }

    if let Some(path) = args.program {
        config.program.path = Some(path);
    }
    if let Some(backend) = args.backend {
        config.storage.backend = backend;
    }

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!(
                "If the data directory is damaged, move it aside or delete it: {}",
                data_dir.display()
            );
            ExitCode::from(1)
        }
    }
}

fn run(config: AppConfig) -> anyhow::Result<()> {
    let program = liftlog::load_program(config.program.path.as_deref());
    tracing::info!(
        "Using storage backend {} in {}",
        config.storage.backend,
        config.data_dir.display()
    );
    let store = open_store(&config)?;

    App::new(config, program, store, Prompter::stdio(), Theme::default())?
        .with_clear_screen(true)
        .run()
}
