pub mod applier;
pub mod catalog;
pub mod error;
pub mod inventory;
pub mod journal;
pub mod matching;
pub mod pricing;
pub mod prompt;
pub mod resolver;
pub mod retry;
pub mod runner;
pub mod session;
pub mod settings;
pub mod summary;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
