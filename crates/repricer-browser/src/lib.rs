//! Chrome automation for the storefront catalog: finding and launching a
//! headed Chrome, driving it over the DevTools protocol, and the manual login.

mod cdp_session;
mod chrome_finder;
mod error;
mod launcher;
mod locators;
mod login;
mod page;
mod profile;
mod session;

pub use cdp_session::CdpSession;
pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use launcher::{ChromeLauncher, DEFAULT_DEBUGGING_PORT};
pub use locators::Locators;
pub use login::LoginFlow;
pub use page::BrowserPage;
pub use profile::{DEFAULT_PROFILE, ProfileManager};
pub use session::{BrowserSession, LaunchOptions, ProfileChoice};
