//! The row loop.
//!
//! Rows are processed strictly in file order. Each row moves through
//! `Pending -> Searching -> Found -> Processing -> Done*`, with shortcuts for
//! rows that already carry a status, non-English rows and foil rows. Every
//! terminal status is written through to the inventory file and the card log
//! before the next row starts.
//!
//! Faults never leave a row: search and apply failures are retried under the
//! configured [`RetryPolicy`](crate::retry::RetryPolicy) and then turned into
//! a status. The one exception is losing the session: if the catalog page
//! cannot be reached again and a fresh login fails, the run stops.

use crate::applier::DiscountApplier;
use crate::catalog::CatalogPage;
use crate::inventory::{InventoryRow, InventoryTable, RowStatus};
use crate::journal::{CardLog, LogEntry};
use crate::matching::SetChoice;
use crate::pricing::DISCOUNT_PERCENT;
use crate::prompt::{ManualDecision, Prompt};
use crate::resolver::{SearchOutcome, SearchResolver};
use crate::session::Session;
use crate::settings::{NotFoundPolicy, RunOptions};
use crate::summary::RunSummary;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug)]
enum RowState {
    Pending,
    Searching,
    Found,
    Processing,
    DoneSuccess,
    DoneFailed,
    DoneSkipped,
}

fn log_state(index: usize, state: RowState) {
    tracing::debug!("row {} state={:?}", index + 1, state);
}

fn done_state(status: RowStatus) -> RowState {
    match status {
        RowStatus::Success => RowState::DoneSuccess,
        RowStatus::Failed | RowStatus::Unset => RowState::DoneFailed,
        RowStatus::Skipped | RowStatus::NonEnglish | RowStatus::Foil => RowState::DoneSkipped,
    }
}

/// Terminal status for a row plus a note for the card log
struct RowOutcome {
    status: RowStatus,
    message: Option<String>,
}

impl RowOutcome {
    fn new(status: RowStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }
}

/// Drives every inventory row through search, discount and save
pub struct Runner<Pr: Prompt> {
    options: RunOptions,
    resolver: SearchResolver,
    applier: DiscountApplier,
    prompt: Pr,
    journal: CardLog,
}

impl<Pr: Prompt> Runner<Pr> {
    pub fn new(options: RunOptions, prompt: Pr, journal: CardLog) -> Self {
        let resolver = SearchResolver::new(options.category.clone(), options.timings);
        let applier = DiscountApplier::new(DISCOUNT_PERCENT, options.timings.save_settle);
        Self {
            options,
            resolver,
            applier,
            prompt,
            journal,
        }
    }

    pub fn journal(&self) -> &CardLog {
        &self.journal
    }

    /// Process all rows, then release the session.
    ///
    /// The session is released exactly once whatever happens, and the summary
    /// trailer is always appended to the card log.
    pub async fn run<S: Session>(&mut self, table: &mut InventoryTable, session: &mut S) -> RunSummary {
        let summary = self.process_rows(table, session).await;

        session.release().await;

        if let Err(e) = self.journal.write_summary(&summary) {
            tracing::warn!("Could not write summary to card log: {}", e);
        }

        tracing::info!(
            "Run finished: {} succeeded, {} failed, {} skipped, {} non-English, {} foil of {} rows",
            summary.successful,
            summary.failed,
            summary.skipped,
            summary.non_english,
            summary.foil,
            summary.total
        );

        summary
    }

    async fn process_rows<S: Session>(&mut self, table: &mut InventoryTable, session: &mut S) -> RunSummary {
        let total = table.len();
        let mut summary = RunSummary::new(total);

        for index in 0..total {
            let Some(row) = table.row(index).cloned() else {
                break;
            };
            log_state(index, RowState::Pending);

            if row.status.is_terminal() {
                tracing::debug!("Row {} already {}: {}", index + 1, row.status, row.label());
                summary.record(row.status, identifier(&row, row.status));
                log_state(index, done_state(row.status));
                continue;
            }

            tracing::info!("Processing card {}/{}: {}", index + 1, total, row.label());

            if !row.is_english() {
                tracing::info!(
                    "Skipping non-English card: {} ({})",
                    row.product_name,
                    row.language
                );
                let outcome = RowOutcome::new(
                    RowStatus::NonEnglish,
                    format!("Language: {}", row.language),
                );
                self.finish_row(table, index, &row, outcome, &mut summary);
                continue;
            }

            if row.is_foil() {
                tracing::info!("Skipping foil card: {}", row.product_name);
                self.finish_row(table, index, &row, RowOutcome::new(RowStatus::Foil, "Foil card"), &mut summary);
                continue;
            }

            let outcome = match self.process_card(session.page(), index, &row).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Unexpected error processing card {}: {}", row.product_name, e);
                    RowOutcome::new(RowStatus::Failed, format!("Error: {}", e))
                }
            };
            self.finish_row(table, index, &row, outcome, &mut summary);

            if let Err(e) = self.return_to_catalog(session).await {
                tracing::error!("Session could not be recovered: {}", e);
                summary.aborted = Some(e.to_string());
                break;
            }
        }

        summary
    }

    /// Search, escalate if needed, then apply the discount
    async fn process_card<P>(&mut self, page: &mut P, index: usize, row: &InventoryRow) -> Result<RowOutcome>
    where
        P: CatalogPage + ?Sized,
    {
        let retry = self.options.retry;

        log_state(index, RowState::Searching);
        let mut choice = None;
        for attempt in retry.attempts() {
            match self.resolver.resolve(page, &row.product_name, &row.set_name).await {
                SearchOutcome::Found(found) => {
                    choice = Some(found);
                    break;
                }
                SearchOutcome::NotFound => {
                    if !retry.wait_before_retry(attempt).await {
                        break;
                    }
                    tracing::info!(
                        "Retrying search (attempt {}/{})...",
                        attempt + 1,
                        retry.max_attempts
                    );
                }
            }
        }

        let note = match choice {
            Some(SetChoice::Exact(set)) => format!("set '{}'", set),
            Some(SetChoice::Partial(set)) => format!("partial set match '{}'", set),
            Some(SetChoice::AllSets) => "all sets".to_string(),
            None => {
                tracing::warn!(
                    "Failed to find card after {} attempts: {}",
                    retry.max_attempts,
                    row.product_name
                );
                let decision = match self.options.not_found {
                    NotFoundPolicy::Skip => ManualDecision::Skip,
                    NotFoundPolicy::Prompt => {
                        self.prompt.unresolved_row(row, retry.max_attempts).await?
                    }
                };
                match decision {
                    ManualDecision::Skip => {
                        return Ok(RowOutcome::new(
                            RowStatus::Skipped,
                            format!("Not found after {} attempts", retry.max_attempts),
                        ));
                    }
                    ManualDecision::Continue => "located manually".to_string(),
                }
            }
        };
        log_state(index, RowState::Found);

        log_state(index, RowState::Processing);
        let mut last_error = None;
        for attempt in retry.attempts() {
            match self.applier.apply(page, row.quantity).await {
                Ok(change) => {
                    return Ok(RowOutcome::new(
                        RowStatus::Success,
                        format!(
                            "${} -> ${}, quantity {} ({})",
                            change.old, change.new, change.quantity, note
                        ),
                    ));
                }
                Err(e) => {
                    tracing::warn!("Error processing card {}: {}", row.product_name, e);
                    last_error = Some(e);
                    if !retry.wait_before_retry(attempt).await {
                        break;
                    }
                    tracing::info!(
                        "Retrying processing (attempt {}/{})...",
                        attempt + 1,
                        retry.max_attempts
                    );
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        Ok(RowOutcome::new(
            RowStatus::Failed,
            format!("Failed after {} attempts: {}", retry.max_attempts, reason),
        ))
    }

    /// Persist, log and count a terminal status
    fn finish_row(
        &self,
        table: &mut InventoryTable,
        index: usize,
        row: &InventoryRow,
        outcome: RowOutcome,
        summary: &mut RunSummary,
    ) {
        let status = outcome.status;

        if let Err(e) = table.persist(index, status) {
            tracing::error!(
                "Could not save status {} for row {} ({}): {}",
                status,
                index + 1,
                row.label(),
                e
            );
        }

        let entry = LogEntry::now(&row.product_name, &row.set_name, status, outcome.message);
        if let Err(e) = self.journal.record(&entry) {
            tracing::warn!("Could not write card log entry: {}", e);
        }

        summary.record(status, identifier(row, status));
        log_state(index, done_state(status));
    }

    /// Go back to the catalog page; restart the session when that fails.
    ///
    /// Only a failed restart is returned as an error.
    async fn return_to_catalog<S: Session>(&self, session: &mut S) -> Result<()> {
        let timeout = self.options.timings.navigation_timeout;

        let fault = match session.page().open_catalog(timeout).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        tracing::warn!("Could not return to the catalog page: {}", fault);

        // One more plain navigation before giving up on the session
        if session.page().open_catalog(timeout).await.is_ok() {
            return Ok(());
        }

        tracing::warn!("Failed to recover. Restarting browser...");
        session.restart().await.map_err(|e| match e {
            Error::Auth(msg) => Error::Auth(msg),
            other => Error::Auth(format!("login failed during recovery: {}", other)),
        })?;

        tracing::info!("Browser session restarted");
        Ok(())
    }
}

/// Row identifier used in the summary lists
fn identifier(row: &InventoryRow, status: RowStatus) -> String {
    match status {
        RowStatus::NonEnglish => format!("{} ({})", row.product_name, row.language),
        _ => row.label(),
    }
}
