use async_trait::async_trait;
use console::{Term, style};
use repricer_core::inventory::InventoryRow;
use repricer_core::prompt::{ManualDecision, Prompt};
use repricer_core::{Error, Result};

/// Asks the operator on the controlling terminal
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompt {
    /// Whether stdout is an interactive terminal that keys can be read from
    attended: bool,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            attended: Term::stdout().is_term(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn wait_for_login(&mut self, url: &str, username: &str) -> Result<()> {
        println!();
        println!("{}", style("Login required").bold().yellow());
        println!("  Storefront: {}", url);
        println!("  Account:    {}", username);
        println!();
        println!("Log in in the Chrome window (the form has been prefilled where possible)");
        println!("and complete any CAPTCHA, then press Enter here to continue...");

        tokio::task::spawn_blocking(|| Term::stdout().read_line())
            .await
            .map_err(|e| Error::Prompt(format!("input task failed: {}", e)))?
            .map_err(|e| Error::Prompt(format!("could not read from terminal: {}", e)))?;

        Ok(())
    }

    async fn unresolved_row(&mut self, row: &InventoryRow, attempts: u32) -> Result<ManualDecision> {
        if !self.attended {
            tracing::warn!(
                "No terminal attached, skipping {} (not found after {} attempts)",
                row.label(),
                attempts
            );
            return Ok(ManualDecision::Skip);
        }

        println!();
        println!(
            "{} {} not found after {} attempts",
            style("!").bold().yellow(),
            style(row.label()).bold(),
            attempts
        );
        println!("  c) I found it in the browser, continue with this card");
        println!("  s) Skip this card");

        loop {
            let key = tokio::task::spawn_blocking(|| Term::stdout().read_char())
                .await
                .map_err(|e| Error::Prompt(format!("input task failed: {}", e)))?
                .map_err(|e| Error::Prompt(format!("could not read from terminal: {}", e)))?;

            match key.to_ascii_lowercase() {
                'c' => return Ok(ManualDecision::Continue),
                's' => return Ok(ManualDecision::Skip),
                _ => println!("Press 'c' to continue or 's' to skip"),
            }
        }
    }
}
