use crate::launcher::DEFAULT_DEBUGGING_PORT;
use crate::login::LoginFlow;
use crate::page::BrowserPage;
use crate::profile::DEFAULT_PROFILE;
use crate::{CdpSession, ChromeFinder, ChromeLauncher, Error, Locators, ProfileManager, Result};
use async_trait::async_trait;
use repricer_core::prompt::Prompt;
use repricer_core::session::Session;
use repricer_core::settings::Settings;
use std::path::PathBuf;
use std::process::Child;

/// Which Chrome user-data directory the automation browser runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileChoice {
    Named(String),
    Temporary,
}

impl Default for ProfileChoice {
    fn default() -> Self {
        ProfileChoice::Named(DEFAULT_PROFILE.to_string())
    }
}

/// How to start the automation browser
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Explicit Chrome binary; detected when absent
    pub chrome_path: Option<PathBuf>,
    pub profile: ProfileChoice,
    pub debugging_port: u16,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            chrome_path: None,
            profile: ProfileChoice::default(),
            debugging_port: DEFAULT_DEBUGGING_PORT,
        }
    }
}

/// Everything that has to be torn down when the browser goes away
struct LiveBrowser {
    cdp: CdpSession,
    child: Child,
    // Dropped last so a temporary profile outlives the process using it
    _profile: ProfileManager,
}

impl LiveBrowser {
    async fn shutdown(self) {
        let LiveBrowser {
            cdp,
            mut child,
            _profile,
        } = self;

        cdp.close().await;

        if let Err(e) = child.kill() {
            tracing::debug!("Chrome already gone: {}", e);
        }
        match tokio::task::spawn_blocking(move || child.wait()).await {
            Ok(Ok(status)) => tracing::debug!("Chrome exited with {}", status),
            Ok(Err(e)) => tracing::debug!("Waiting for Chrome failed: {}", e),
            Err(e) => tracing::debug!("Chrome wait task failed: {}", e),
        }
    }
}

/// A logged-in Chrome on the storefront catalog, driven over CDP
pub struct BrowserSession<P: Prompt> {
    settings: Settings,
    launch: LaunchOptions,
    locators: Locators,
    prompt: P,
    page: BrowserPage,
    live: Option<LiveBrowser>,
}

impl<P: Prompt> BrowserSession<P> {
    /// Start Chrome, connect to it and see the operator through login.
    ///
    /// Anything started along the way is torn down again on failure.
    pub async fn establish(settings: Settings, launch: LaunchOptions, mut prompt: P) -> Result<Self> {
        let locators = Locators::default();
        let (live, page) = start(&settings, &launch, &locators, &mut prompt).await?;

        Ok(Self {
            settings,
            launch,
            locators,
            prompt,
            page,
            live: Some(live),
        })
    }
}

async fn start<P: Prompt>(
    settings: &Settings,
    launch: &LaunchOptions,
    locators: &Locators,
    prompt: &mut P,
) -> Result<(LiveBrowser, BrowserPage)> {
    let chrome_path = ChromeFinder::new(launch.chrome_path.clone()).find()?;
    tracing::info!("Using Chrome at {}", chrome_path.display());

    let profile = match &launch.profile {
        ProfileChoice::Named(name) => ProfileManager::named(name)?,
        ProfileChoice::Temporary => ProfileManager::temporary()?,
    };
    tracing::debug!("Chrome profile: {}", profile.path().display());

    let launcher = ChromeLauncher::new(
        chrome_path,
        profile.path().to_path_buf(),
        settings.catalog_url.to_string(),
        launch.debugging_port,
    );
    let mut child = launcher.launch()?;

    let cdp = match CdpSession::connect(launcher.debugging_port()).await {
        Ok(cdp) => cdp,
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    };

    let timings = settings.run.timings;
    let page = BrowserPage::new(
        cdp.page.clone(),
        locators.clone(),
        settings.catalog_url.to_string(),
        timings.element_timeout,
    );
    let live = LiveBrowser {
        cdp,
        child,
        _profile: profile,
    };

    let marker = settings.catalog_marker();
    let login = LoginFlow::new(&settings.credentials, &marker, timings);
    if let Err(e) = login.run(&page, prompt).await {
        live.shutdown().await;
        return Err(e);
    }

    Ok((live, page))
}

#[async_trait]
impl<P: Prompt> Session for BrowserSession<P> {
    type Page = BrowserPage;

    fn page(&mut self) -> &mut BrowserPage {
        &mut self.page
    }

    async fn restart(&mut self) -> repricer_core::Result<()> {
        tracing::info!("Restarting browser session");
        if let Some(live) = self.live.take() {
            live.shutdown().await;
        }

        let (live, page) = start(&self.settings, &self.launch, &self.locators, &mut self.prompt)
            .await
            .map_err(|e| match e {
                Error::Login(msg) => repricer_core::Error::Auth(msg),
                other => repricer_core::Error::Auth(format!("browser restart failed: {}", other)),
            })?;

        self.page = page;
        self.live = Some(live);
        Ok(())
    }

    async fn release(&mut self) {
        if let Some(live) = self.live.take() {
            tracing::info!("Closing browser");
            live.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_launch_uses_persistent_profile() {
        let options = LaunchOptions::default();
        assert_eq!(options.profile, ProfileChoice::Named("default".to_string()));
        assert_eq!(options.debugging_port, 9222);
        assert!(options.chrome_path.is_none());
    }
}
