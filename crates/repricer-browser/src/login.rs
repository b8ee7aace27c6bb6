use crate::page::BrowserPage;
use crate::{Error, Result};
use repricer_core::prompt::Prompt;
use repricer_core::settings::{Credentials, Timings};

/// Walks the operator through the storefront login.
///
/// Login itself stays manual because the storefront puts CAPTCHAs in front of
/// it. The flow only prefills what it can and then checks the outcome.
pub struct LoginFlow<'a> {
    credentials: &'a Credentials,
    catalog_marker: &'a str,
    timings: Timings,
}

impl<'a> LoginFlow<'a> {
    pub fn new(credentials: &'a Credentials, catalog_marker: &'a str, timings: Timings) -> Self {
        Self {
            credentials,
            catalog_marker,
            timings,
        }
    }

    /// Leave `page` logged in and on the catalog entry page
    pub async fn run<P: Prompt + ?Sized>(&self, page: &BrowserPage, prompt: &mut P) -> Result<()> {
        page.goto(page.catalog_url())
            .await
            .map_err(|e| Error::Navigation(e.to_string()))?;

        if page
            .appears(&page.locators().logged_in_marker, self.timings.login_check)
            .await
        {
            tracing::info!("Already logged in");
            return page.open_catalog_page(self.timings.navigation_timeout).await;
        }

        tracing::info!("Not logged in, waiting for manual login");
        self.prefill(page).await;

        prompt
            .wait_for_login(page.catalog_url(), self.credentials.username())
            .await
            .map_err(|e| Error::Login(e.to_string()))?;

        if !page
            .wait_for_url(self.catalog_marker, self.timings.login_verify)
            .await?
        {
            let url = page.current_url().await.unwrap_or_default();
            return Err(Error::Login(format!(
                "still not on the catalog after login (at {})",
                url
            )));
        }

        tracing::info!("Login confirmed");
        page.open_catalog_page(self.timings.navigation_timeout).await
    }

    /// Type the stored credentials into the login form if it is showing
    async fn prefill(&self, page: &BrowserPage) {
        let locators = page.locators();

        if let Err(e) = page
            .clear_and_type(&locators.login_email, self.credentials.username())
            .await
        {
            tracing::debug!("Could not prefill username: {}", e);
            return;
        }
        if let Err(e) = page
            .clear_and_type(&locators.login_password, self.credentials.password())
            .await
        {
            tracing::debug!("Could not prefill password: {}", e);
        }
    }
}
