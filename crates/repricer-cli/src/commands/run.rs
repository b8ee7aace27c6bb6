use crate::OutputFormat;
use crate::terminal::TerminalPrompt;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use repricer_browser::{BrowserSession, DEFAULT_DEBUGGING_PORT, DEFAULT_PROFILE, LaunchOptions, ProfileChoice};
use repricer_core::inventory::InventoryTable;
use repricer_core::journal::CardLog;
use repricer_core::retry::RetryPolicy;
use repricer_core::runner::Runner;
use repricer_core::settings::{
    Credentials, DEFAULT_CATALOG_URL, DEFAULT_CATEGORY, NotFoundPolicy, RunOptions, Settings, Timings,
};
use repricer_core::summary::RunSummary;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What to do with a card the search cannot find
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OnNotFound {
    /// Mark the row SKIPPED and move on
    Skip,
    /// Ask whether the card was found by hand
    Prompt,
}

impl From<OnNotFound> for NotFoundPolicy {
    fn from(value: OnNotFound) -> Self {
        match value {
            OnNotFound::Skip => NotFoundPolicy::Skip,
            OnNotFound::Prompt => NotFoundPolicy::Prompt,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Inventory file (CSV) to process; statuses are written back to it
    #[arg(long, value_name = "FILE", env = "REPRICER_FILE")]
    pub file: PathBuf,

    /// Storefront catalog page
    #[arg(long, env = "REPRICER_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Storefront account name
    #[arg(long, env = "TCGPLAYER_USERNAME", hide_env_values = true)]
    pub username: Option<String>,

    /// Storefront account password
    #[arg(long, env = "TCGPLAYER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Directory for the per-run card log
    #[arg(long, env = "REPRICER_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Path to Chrome binary (auto-detected if not specified)
    #[arg(long, env = "REPRICER_CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Chrome profile under ~/.repricer/profiles; keeps the login between runs
    #[arg(long, env = "REPRICER_PROFILE", default_value = DEFAULT_PROFILE, conflicts_with = "temp_profile")]
    pub profile: String,

    /// Use a throwaway Chrome profile (login is asked for every time)
    #[arg(long)]
    pub temp_profile: bool,

    /// Chrome remote debugging port
    #[arg(long, env = "REPRICER_DEBUGGING_PORT", default_value_t = DEFAULT_DEBUGGING_PORT)]
    pub debugging_port: u16,

    /// Product line selected in the catalog's category filter
    #[arg(long, env = "REPRICER_CATEGORY", default_value = DEFAULT_CATEGORY)]
    pub category: String,

    /// What to do when a card cannot be found
    #[arg(long, value_enum, env = "REPRICER_ON_NOT_FOUND", default_value = "prompt")]
    pub on_not_found: OnNotFound,

    /// Attempts for the search and for the price update
    #[arg(long, env = "REPRICER_MAX_ATTEMPTS", default_value_t = 3,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    /// Seconds to wait between attempts
    #[arg(long, env = "REPRICER_RETRY_DELAY_SECS", default_value_t = 2)]
    pub retry_delay_secs: u64,
}

impl RunArgs {
    /// Validate everything that can be checked before Chrome starts
    pub fn settings(&self) -> Result<Settings> {
        let credentials = Credentials::new(
            self.username.clone().unwrap_or_default(),
            self.password.clone().unwrap_or_default(),
        )
        .context("Set TCGPLAYER_USERNAME and TCGPLAYER_PASSWORD (or pass --username/--password)")?;

        let run = RunOptions {
            category: self.category.clone(),
            not_found: self.on_not_found.into(),
            retry: RetryPolicy::fixed(self.max_attempts, Duration::from_secs(self.retry_delay_secs)),
            timings: Timings::default(),
        };

        Ok(Settings::new(
            self.file.clone(),
            &self.catalog_url,
            credentials,
            self.log_dir.clone(),
            run,
        )?)
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            chrome_path: self.chrome_path.clone(),
            profile: if self.temp_profile {
                ProfileChoice::Temporary
            } else {
                ProfileChoice::Named(self.profile.clone())
            },
            debugging_port: self.debugging_port,
        }
    }
}

pub fn execute(args: RunArgs, format: OutputFormat) -> Result<()> {
    let settings = args.settings()?;
    let launch = args.launch_options();

    let mut table = InventoryTable::load(&settings.inventory)
        .with_context(|| format!("Could not open inventory {}", settings.inventory.display()))?;

    let journal = CardLog::create(&settings.log_dir)
        .with_context(|| format!("Failed to create card log in {}", settings.log_dir.display()))?;
    let log_path = journal.path().to_path_buf();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let summary = runtime.block_on(async {
        let options = settings.run.clone();
        let mut session = match BrowserSession::establish(settings, launch, TerminalPrompt::new()).await {
            Ok(session) => session,
            Err(e) => {
                let mut summary = RunSummary::new(table.len());
                summary.aborted = Some(format!("could not start browser session: {}", e));
                if let Err(log_err) = journal.write_summary(&summary) {
                    tracing::warn!("Could not write summary to card log: {}", log_err);
                }
                return Err(anyhow::Error::new(e).context("Could not start browser session"));
            }
        };

        let mut runner = Runner::new(options, TerminalPrompt::new(), journal);
        Ok(runner.run(&mut table, &mut session).await)
    })?;

    print_summary(&summary, &log_path, table.backup_path(), format)?;

    if let Some(reason) = &summary.aborted {
        anyhow::bail!("Run aborted: {}", reason);
    }

    Ok(())
}

fn print_summary(
    summary: &RunSummary,
    log_path: &Path,
    backup: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        OutputFormat::Pretty => {
            println!();
            println!("{}", style("=== Processing Summary ===").bold());
            for line in summary.counter_lines() {
                println!("{}", line);
            }

            for (title, rows) in summary.attention_sections() {
                println!();
                println!("{}:", style(title).yellow());
                for row in rows {
                    println!("  - {}", row);
                }
            }

            println!();
            println!("Card log: {}", log_path.display());
            if let Some(backup) = backup {
                println!("Backup:   {}", backup.display());
            }
            if let Some(reason) = &summary.aborted {
                println!("{} {}", style("Run aborted:").red().bold(), reason);
            }
        }
    }

    Ok(())
}
