use crate::Result;
use crate::inventory::RowStatus;
use crate::summary::RunSummary;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line of the card log
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub card_name: String,
    pub set_name: String,
    pub status: RowStatus,
    pub message: Option<String>,
}

impl LogEntry {
    pub fn now(card_name: &str, set_name: &str, status: RowStatus, message: Option<String>) -> Self {
        Self {
            timestamp: Local::now(),
            card_name: card_name.to_string(),
            set_name: set_name.to_string(),
            status,
            message,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.timestamp.format(TIME_FORMAT),
            self.card_name,
            self.set_name,
            self.status
        )?;
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            write!(f, " - {}", message)?;
        }
        Ok(())
    }
}

/// Append-only, human readable log of per-card outcomes, one file per run
#[derive(Debug, Clone)]
pub struct CardLog {
    path: PathBuf,
}

impl CardLog {
    /// Create `card_processing_<timestamp>.log` in `dir` with its header line
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let now = Local::now();
        let path = dir.join(format!("card_processing_{}.log", now.format("%Y%m%d_%H%M%S")));

        let mut file = File::create(&path)?;
        writeln!(file, "=== Card Processing Log - {} ===\n", now.format(TIME_FORMAT))?;

        tracing::info!("Card log: {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, entry: &LogEntry) -> Result<()> {
        let mut file = self.open()?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }

    /// Append the summary trailer
    pub fn write_summary(&self, summary: &RunSummary) -> Result<()> {
        let mut file = self.open()?;
        writeln!(file, "\n\n=== Processing Summary ===")?;
        for line in summary.counter_lines() {
            writeln!(file, "{}", line)?;
        }
        if let Some(reason) = &summary.aborted {
            writeln!(file, "Run aborted: {}", reason)?;
        }
        Ok(())
    }

    fn open(&self) -> Result<File> {
        Ok(OpenOptions::new().append(true).open(&self.path)?)
    }
}
