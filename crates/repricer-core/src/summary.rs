use crate::inventory::RowStatus;
use serde::{Deserialize, Serialize};

/// Outcome counts and row lists for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub non_english: usize,
    pub foil: usize,
    pub successful_rows: Vec<String>,
    pub failed_rows: Vec<String>,
    pub skipped_rows: Vec<String>,
    pub non_english_rows: Vec<String>,
    pub foil_rows: Vec<String>,
    /// Set when the run stopped early because the session could not be recovered
    pub aborted: Option<String>,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Count a row in the bucket for its terminal status
    pub fn record(&mut self, status: RowStatus, row: impl Into<String>) {
        let row = row.into();
        match status {
            RowStatus::Success => {
                self.successful += 1;
                self.successful_rows.push(row);
            }
            RowStatus::Failed => {
                self.failed += 1;
                self.failed_rows.push(row);
            }
            RowStatus::Skipped => {
                self.skipped += 1;
                self.skipped_rows.push(row);
            }
            RowStatus::NonEnglish => {
                self.non_english += 1;
                self.non_english_rows.push(row);
            }
            RowStatus::Foil => {
                self.foil += 1;
                self.foil_rows.push(row);
            }
            RowStatus::Unset => {
                tracing::warn!("Ignoring unset status for {}", row);
            }
        }
    }

    /// Rows that ended in some bucket
    pub fn counted(&self) -> usize {
        self.successful + self.failed + self.skipped + self.non_english + self.foil
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// Counter block shared by the console and the card log
    pub fn counter_lines(&self) -> Vec<String> {
        vec![
            format!("Total cards: {}", self.total),
            format!("Successfully processed: {}", self.successful),
            format!("Failed to process: {}", self.failed),
            format!("Skipped cards (not found): {}", self.skipped),
            format!("Non-English cards (skipped): {}", self.non_english),
            format!("Foil cards (skipped): {}", self.foil),
        ]
    }

    /// Rows that still need attention, grouped by reason
    pub fn attention_sections(&self) -> Vec<(&'static str, &[String])> {
        [
            ("Failed cards", self.failed_rows.as_slice()),
            ("Skipped cards", self.skipped_rows.as_slice()),
            (
                "Non-English cards (to process manually)",
                self.non_english_rows.as_slice(),
            ),
            ("Foil cards (to process manually)", self.foil_rows.as_slice()),
        ]
        .into_iter()
        .filter(|(_, rows)| !rows.is_empty())
        .collect()
    }
}
