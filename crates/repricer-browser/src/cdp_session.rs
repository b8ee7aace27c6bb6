use crate::{Error, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Live DevTools connection to a Chrome started by [`crate::ChromeLauncher`]
pub struct CdpSession {
    pub browser: Browser,
    pub page: Page,
    handler_task: JoinHandle<()>,
}

impl CdpSession {
    /// Connect to Chrome on `debugging_port` and pick the working tab.
    ///
    /// Chrome needs a moment to open the port after launch, so the
    /// connection is retried a few times.
    pub async fn connect(debugging_port: u16) -> Result<Self> {
        let endpoint = format!("http://localhost:{}", debugging_port);
        tracing::info!("Connecting to Chrome on port {}", debugging_port);

        let (browser, mut handler) = {
            let mut attempt = 1;
            loop {
                tracing::debug!("Attempting CDP connection to {}...", endpoint);
                match Browser::connect(&endpoint).await {
                    Ok(result) => break result,
                    Err(e) if attempt < CONNECT_ATTEMPTS => {
                        tracing::debug!(
                            "CDP connection attempt {}/{} failed: {}",
                            attempt,
                            CONNECT_ATTEMPTS,
                            e
                        );
                        attempt += 1;
                        tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                    }
                    Err(e) => {
                        return Err(Error::Cdp(format!(
                            "Failed to connect to Chrome after {} attempts: {}",
                            CONNECT_ATTEMPTS, e
                        )));
                    }
                }
            }
        };

        // The handler must be polled for any command on the browser to complete
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        // Chrome opens its first tab shortly after the port comes up
        tokio::time::sleep(CONNECT_RETRY_DELAY).await;

        let page = match browser.pages().await?.into_iter().next() {
            Some(page) => page,
            None => {
                tracing::debug!("No existing tab, opening a new one");
                browser.new_page("about:blank").await?
            }
        };

        tracing::info!("CDP connection established");

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Close the browser over CDP and stop the event pump
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser close over CDP failed: {}", e);
        }
        self.handler_task.abort();
    }
}
