use crate::retry::RetryPolicy;
use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://store.tcgplayer.com/admin/product/catalog";
pub const DEFAULT_CATEGORY: &str = "Magic";

/// Storefront account used for the manual login
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into().trim().to_string();
        let password = password.into();

        if username.is_empty() {
            return Err(Error::Config("storefront username is missing".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Config("storefront password is missing".to_string()));
        }

        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// What to do with a row whose card could not be found after all retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotFoundPolicy {
    /// Record the row as skipped
    Skip,
    /// Ask the operator to locate the card by hand or skip it
    #[default]
    Prompt,
}

/// Bounded waits used against the catalog UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Interactive elements (search field, price display)
    pub element_timeout: Duration,
    /// Search results marker
    pub results_timeout: Duration,
    /// Pause after choosing a category so the set list can reload
    pub category_settle: Duration,
    /// Pause after clicking save
    pub save_settle: Duration,
    /// Return to the catalog page between rows
    pub navigation_timeout: Duration,
    /// "Already logged in" check when opening the catalog
    pub login_check: Duration,
    /// Post-login URL check after the operator confirms
    pub login_verify: Duration,
}

impl Timings {
    /// No waiting at all, for tests
    pub fn instant() -> Self {
        Self {
            element_timeout: Duration::ZERO,
            results_timeout: Duration::ZERO,
            category_settle: Duration::ZERO,
            save_settle: Duration::ZERO,
            navigation_timeout: Duration::ZERO,
            login_check: Duration::ZERO,
            login_verify: Duration::ZERO,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            element_timeout: Duration::from_secs(10),
            results_timeout: Duration::from_secs(10),
            category_settle: Duration::from_secs(1),
            save_settle: Duration::from_secs(2),
            navigation_timeout: Duration::from_secs(20),
            login_check: Duration::from_secs(5),
            login_verify: Duration::from_secs(10),
        }
    }
}

/// Options that drive the row loop
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Product line selected in the category filter
    pub category: String,
    pub not_found: NotFoundPolicy,
    pub retry: RetryPolicy,
    pub timings: Timings,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            not_found: NotFoundPolicy::default(),
            retry: RetryPolicy::default(),
            timings: Timings::default(),
        }
    }
}

/// Everything a run needs, validated before any browser is started
#[derive(Debug, Clone)]
pub struct Settings {
    pub inventory: PathBuf,
    pub catalog_url: Url,
    pub credentials: Credentials,
    pub log_dir: PathBuf,
    pub run: RunOptions,
}

impl Settings {
    pub fn new(
        inventory: PathBuf,
        catalog_url: &str,
        credentials: Credentials,
        log_dir: PathBuf,
        run: RunOptions,
    ) -> Result<Self> {
        let catalog_url = Url::parse(catalog_url)
            .map_err(|e| Error::Config(format!("invalid catalog URL '{}': {}", catalog_url, e)))?;

        if !matches!(catalog_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "catalog URL must be http(s): {}",
                catalog_url
            )));
        }

        if run.category.trim().is_empty() {
            return Err(Error::Config("category must not be empty".to_string()));
        }

        Ok(Self {
            inventory,
            catalog_url,
            credentials,
            log_dir,
            run,
        })
    }

    /// URL fragment present once the operator is logged in and on the catalog
    pub fn catalog_marker(&self) -> String {
        catalog_marker(&self.catalog_url)
    }
}

/// Path of the catalog URL without the leading slash, e.g. `admin/product/catalog`
pub fn catalog_marker(url: &Url) -> String {
    url.path().trim_matches('/').to_string()
}
