use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load inventory: {0}")]
    Load(String),

    #[error("Inventory I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write inventory: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Card not found: {0}")]
    NotFound(String),

    #[error("Failed to apply price change: {0}")]
    Apply(String),

    #[error("Catalog page not reachable: {0}")]
    Navigation(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("UI interaction failed: {0}")]
    Ui(String),

    #[error("Operator prompt failed: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, Error>;
