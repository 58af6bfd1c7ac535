//! Logging configuration
//!
//! Settings only; the subscriber itself is installed by the application.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Prefix of log file names written by the application
pub const LOG_FILE_PREFIX: &str = "distmatch";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error, off)
    pub level: String,
    /// Write logs to stderr
    pub console_output: bool,
    /// Write logs to a file in `log_directory`
    pub file_output: bool,
    /// Directory for log files
    pub log_directory: PathBuf,
    /// Number of log files to keep (0 keeps everything)
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_directory: PathBuf::from("logs"),
            max_log_files: 10,
        }
    }
}

impl LogConfig {
    /// Parse `level`, falling back to INFO
    pub fn parse_level(&self) -> LevelFilter {
        self.level.trim().parse().unwrap_or(LevelFilter::INFO)
    }

    /// Create the log directory if needed
    pub fn ensure_log_directory(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.log_directory)
    }

    /// Path of the log file for the current run
    pub fn current_log_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
        self.log_directory
            .join(format!("{LOG_FILE_PREFIX}_{stamp}.log"))
    }

    /// Delete the oldest log files so that at most `max_log_files - 1` remain,
    /// leaving room for the file about to be created
    pub fn cleanup_old_logs(&self) -> io::Result<()> {
        if self.max_log_files == 0 || !self.log_directory.exists() {
            return Ok(());
        }

        let mut logs: Vec<PathBuf> = std::fs::read_dir(&self.log_directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_log_file(path))
            .collect();

        // Timestamped names sort chronologically
        logs.sort();

        let keep = self.max_log_files - 1;
        if logs.len() > keep {
            let excess = logs.len() - keep;
            for path in logs.into_iter().take(excess) {
                std::fs::remove_file(path)?;
            }
        }

        Ok(())
    }
}

fn is_log_file(path: &std::path::Path) -> bool {
    let name_matches = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX));
    let ext_matches = path.extension().and_then(|e| e.to_str()) == Some("log");
    name_matches && ext_matches
}
