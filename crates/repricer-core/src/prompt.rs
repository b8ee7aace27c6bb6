use crate::Result;
use crate::inventory::InventoryRow;
use async_trait::async_trait;

/// Operator's answer for a row whose card could not be found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualDecision {
    /// The operator brought the product up by hand; go on and reprice it
    Continue,
    /// Leave the row skipped
    Skip,
}

/// Points where the run waits for a human
#[async_trait]
pub trait Prompt: Send {
    /// Block until the operator reports that login (and any CAPTCHA) is done
    async fn wait_for_login(&mut self, url: &str, username: &str) -> Result<()>;

    /// Ask what to do with a row the search could not resolve
    async fn unresolved_row(&mut self, row: &InventoryRow, attempts: u32) -> Result<ManualDecision>;
}

/// Answers every question the same way without blocking
#[derive(Debug, Clone, Copy)]
pub struct ScriptedPrompt {
    decision: ManualDecision,
}

impl ScriptedPrompt {
    pub fn always_skip() -> Self {
        Self {
            decision: ManualDecision::Skip,
        }
    }

    pub fn always_continue() -> Self {
        Self {
            decision: ManualDecision::Continue,
        }
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn wait_for_login(&mut self, url: &str, _username: &str) -> Result<()> {
        tracing::debug!("Scripted prompt: assuming login at {} is complete", url);
        Ok(())
    }

    async fn unresolved_row(&mut self, row: &InventoryRow, _attempts: u32) -> Result<ManualDecision> {
        tracing::debug!("Scripted prompt: {:?} for {}", self.decision, row.label());
        Ok(self.decision)
    }
}
