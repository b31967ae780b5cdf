/// Logging bootstrap. The terminal UI owns stdout, so events go to a file.
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::ENV_LOG;

pub fn log_path() -> Result<PathBuf> {
    Ok(dirs::data_local_dir()
        .context("Cannot determine data directory")?
        .join("devjournal")
        .join("devjournal.log"))
}

/// `DEVJOURNAL_LOG` first, then the configured level.
fn filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file() -> Result<File> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Installs the global subscriber. Failures leave the program without logging.
pub fn init(configured_level: &str) {
    let file = match open_log_file() {
        Ok(file) => file,
        Err(err) => {
            eprintln!("devjournal: logging disabled: {err:#}");
            return;
        }
    };
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(configured_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    if let Err(err) = installed {
        eprintln!("devjournal: logging disabled: {err}");
    }
}
