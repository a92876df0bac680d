//! File logging for roofplan runs.
//!
//! Each run writes to `~/.roofplan/logs/{run_id}/log`, where the run id is a
//! timestamp plus a short random suffix. Warnings and errors are echoed to
//! stderr so command-line users see them.

use anyhow::{Context, Result};
use chrono::Local;
use dirs::home_dir;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

pub struct RoofplanLogger {
    level: LevelFilter,
    file: Mutex<File>,
    run_id: String,
    log_path: PathBuf,
}

impl RoofplanLogger {
    /// Open a fresh log file for this run under the home directory.
    pub fn new(level: LevelFilter) -> Result<Self> {
        let run_id = Self::new_run_id();

        let log_dir = Self::log_dir(&run_id)?;
        create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_path = log_dir.join("log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

        Ok(Self {
            level,
            file: Mutex::new(file),
            run_id,
            log_path,
        })
    }

    fn new_run_id() -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let uuid = Uuid::new_v4().to_string();
        let short = uuid.split('-').next().unwrap_or("run");
        format!("{timestamp}_{short}")
    }

    pub fn log_dir(run_id: &str) -> Result<PathBuf> {
        let home = home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".roofplan").join("logs").join(run_id))
    }

    /// Install the logger globally.
    pub fn init(level: LevelFilter) -> Result<PathBuf> {
        let logger = Self::new(level)?;
        let run_id = logger.run_id.clone();
        let log_path = logger.log_path.clone();

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        log::info!("roofplan run {}", run_id);
        log::debug!("log file: {}", log_path.display());
        Ok(log_path)
    }

    fn format(record: &Record) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for RoofplanLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = Self::format(record);

        if let Ok(mut file) = self.file.lock() {
            // A failed log write must not take the command down with it.
            let _ = writeln!(file, "{}", message);
        }

        if record.level() <= Level::Warn {
            eprintln!("{}", message);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}
