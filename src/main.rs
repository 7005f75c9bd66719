use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use cinema::app::{App, AppEvent};
use cinema::catalog::CatalogSource;
use cinema::config::Config;
use cinema::preferences::PreferenceManager;
use cinema::storage::{Database, DatabaseError};
use cinema::ui;

/// Get the config directory path (~/.config/cinema/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("cinema");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "cinema", version, about = "Terminal live-stream picker with favorites and recents")]
struct Args {
    /// Channel catalog to load: an http(s) URL or a JSON file path
    #[arg(long, value_name = "URL|PATH")]
    catalog: Option<String>,

    /// Config file (default: ~/.config/cinema/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Forget favorites, recents and UI preferences before starting
    #[arg(long)]
    reset_prefs: bool,
}

/// Send tracing output to `<config_dir>/cinema.log`; the terminal belongs to the TUI.
fn init_logging(config_dir: &std::path::Path) -> Result<()> {
    let log_path = config_dir.join("cinema.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    init_logging(&config_dir)?;

    // User-only access on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    // Open database
    let db_path = config_dir.join("cinema.db");
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of cinema appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    if args.reset_prefs {
        let removed = db
            .clear_preferences()
            .await
            .context("Failed to reset preferences")?;
        tracing::info!(removed, "Preferences reset");
        println!("Preferences reset ({} entries removed).", removed);
    }

    // A broken preference table should not keep the picker from starting
    let prefs = match PreferenceManager::load(&config, &db).await {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load preferences, using config defaults");
            PreferenceManager::from_config(&config)
        }
    };

    let catalog_arg = args.catalog.as_deref().unwrap_or(&config.catalog);
    let catalog_source = CatalogSource::parse(catalog_arg)
        .with_context(|| format!("Invalid catalog source '{}'", catalog_arg))?;

    let mut app =
        App::new(db, &config, prefs, catalog_source).context("Failed to create application")?;

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
