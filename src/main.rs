//! bicho_tracker - Main Entry Point
//!
//! Console front-end for the jogo do bicho results backend.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bicho_tracker::config::load_config;
use bicho_tracker::shell::{ConsoleShell, PromptSaveDialog};
use bicho_tracker::{Controller, Group, HttpBridge};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Betting house to work on, by label or lottery identifier
    #[arg(long, env = "BICHO_HOUSE")]
    house: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available betting houses
    Houses,
    /// Show row count, last update, groups and recommendations
    Info,
    /// Download draw history since the last update
    Fetch {
        /// Request the full history window instead of the missing days
        #[arg(long)]
        all_time: bool,
    },
    /// List stored groups
    Groups,
    /// List draw hours known for the house
    Hours,
    /// List prize places known for the house
    Places,
    /// Store a new group
    AddGroup {
        #[arg(long)]
        hour: String,
        #[arg(long)]
        place: u32,
        /// Comma-separated group numbers
        #[arg(long, value_delimiter = ',', required = true)]
        numbers: Vec<u32>,
    },
    /// Replace a stored group
    EditGroup {
        #[arg(long)]
        id: u32,
        #[arg(long)]
        hour: String,
        #[arg(long)]
        place: u32,
        #[arg(long, value_delimiter = ',', required = true)]
        numbers: Vec<u32>,
    },
    /// Delete a stored group
    DeleteGroup {
        #[arg(long)]
        id: u32,
    },
    /// Show loss-sequence recommendations
    Loss,
    /// Export the house's draw table to CSV
    Export {
        /// Destination file; prompts when omitted
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// `--log-level` wins, then `RUST_LOG`, then the config file
fn log_filter(cli_level: Option<&str>, config_level: &str) -> EnvFilter {
    match cli_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level)),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(args.config.as_str()))?;

    let filter = log_filter(args.log_level.as_deref(), &config.settings.log_level);
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting bicho_tracker");
    info!("Configuration file: {}", args.config);

    let export_path = match &args.command {
        Command::Export { path } => path.clone(),
        _ => None,
    };

    let bridge = Arc::new(HttpBridge::new(&config.bridge)?);
    let shell = Arc::new(ConsoleShell::new());
    let dialog = Arc::new(PromptSaveDialog::new(export_path));
    let controller = Controller::new(bridge, shell, dialog, config.settings.clone());

    let _progress = controller.start().await;

    if matches!(args.command, Command::Houses) {
        return Ok(());
    }

    let Some(key) = args.house.as_deref() else {
        bail!("--house is required for this command");
    };
    let house = controller.select_house(key)?;

    match args.command {
        Command::Houses => {}
        Command::Info => controller.refresh_table_info().await,
        Command::Fetch { all_time } => {
            // The fetch window is computed from the header's last-update label.
            controller.refresh_table_info().await;
            controller.fetch_house_data(None, all_time).await;
        }
        Command::Groups => {
            controller.groups(&house.name).await;
        }
        Command::Hours => {
            for hour in controller.hours(&house.name).await {
                println!("{}", hour);
            }
        }
        Command::Places => {
            for place in controller.places(&house.name).await {
                println!("{}", place);
            }
        }
        Command::AddGroup { hour, place, numbers } => {
            controller
                .add_group(&house.name, Group::new(hour, place, numbers))
                .await;
        }
        Command::EditGroup {
            id,
            hour,
            place,
            numbers,
        } => {
            controller
                .update_group(&house.name, Group::new(hour, place, numbers).with_id(id))
                .await?;
        }
        Command::DeleteGroup { id } => controller.delete_group(id).await,
        Command::Loss => {
            controller.loss_sequence(&house.name).await;
        }
        Command::Export { .. } => controller.export_csv().await,
    }

    info!("Done");
    Ok(())
}
