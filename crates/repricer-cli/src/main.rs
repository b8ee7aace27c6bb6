use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use repricer_cli::OutputFormat;
use repricer_cli::commands;
use repricer_cli::commands::run::RunArgs;
use repricer_core::inventory::RowStatus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repricer")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Discount and restock storefront listings from an inventory spreadsheet",
    long_about = "Repricer walks an inventory file row by row, finds each card in the storefront's \
                  admin catalog through a real Chrome window, takes 10% off the current price and \
                  saves the new quantity. Progress is written back to the file so an interrupted \
                  run resumes where it stopped."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Reprice every unprocessed row of an inventory file
    Run(RunArgs),

    /// Show how many rows carry each status
    Status {
        /// Path to the inventory file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Clear row statuses so the next run retries those rows
    Reset {
        /// Path to the inventory file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only clear these statuses (e.g. FAILED, SKIPPED); all when omitted
        #[arg(long, value_name = "STATUS", num_args = 1..)]
        only: Vec<RowStatus>,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS:\n  \
                            bash, zsh, fish, powershell, elvish\n\n\
                            INSTALLATION:\n  \
                            bash:  repricer completion --shell bash >> ~/.bashrc\n  \
                            zsh:   repricer completion --shell zsh >> ~/.zshrc\n  \
                            fish:  repricer completion --shell fish > ~/.config/fish/completions/repricer.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    // A missing .env is fine; real environment variables win
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, cli.format),
        Commands::Status { file } => commands::status::execute(&file, cli.format),
        Commands::Reset { file, only } => commands::reset::execute(&file, &only),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("repricer=debug,repricer_cli=debug,repricer_core=debug,repricer_browser=debug")
    } else {
        EnvFilter::new("repricer=info,repricer_cli=info,repricer_core=info,repricer_browser=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
