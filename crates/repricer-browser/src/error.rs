use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Catalog page not reachable: {0}")]
    Navigation(String),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<Error> for repricer_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Navigation(msg) => repricer_core::Error::Navigation(msg),
            Error::Login(msg) => repricer_core::Error::Auth(msg),
            other => repricer_core::Error::Ui(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
