use crate::{Error, Locators, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::element::Element;
use repricer_core::catalog::CatalogPage;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The catalog tab of the automation browser
pub struct BrowserPage {
    page: Page,
    locators: Locators,
    catalog_url: String,
    element_timeout: Duration,
}

impl BrowserPage {
    pub fn new(page: Page, locators: Locators, catalog_url: String, element_timeout: Duration) -> Self {
        Self {
            page,
            locators,
            catalog_url,
            element_timeout,
        }
    }

    pub fn locators(&self) -> &Locators {
        &self.locators
    }

    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    pub async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    /// Poll until `selector` matches an element; at least one lookup is made
    pub async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<Element> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(Error::ElementNotFound(selector.to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Whether `selector` shows up within `timeout`
    pub async fn appears(&self, selector: &str, timeout: Duration) -> bool {
        self.wait_for(selector, timeout).await.is_ok()
    }

    /// Poll the page URL until it contains `marker`
    pub async fn wait_for_url(&self, marker: &str, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.current_url().await?.contains(marker) {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Empty an input the way a user would, then type `text` into it
    pub async fn clear_and_type(&self, selector: &str, text: &str) -> Result<()> {
        let element = self.wait_for(selector, self.element_timeout).await?;

        let js = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.value = '';
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                return true;
            }})()"#,
            sel = js_string(selector)
        );
        self.eval_bool(&js).await?;

        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    /// Visible option texts of a `<select>`
    pub async fn select_options(&self, selector: &str) -> Result<Vec<String>> {
        self.wait_for(selector, self.element_timeout).await?;

        let js = format!(
            r#"(() => {{
                const sel = document.querySelector({sel});
                if (!sel) return null;
                return Array.from(sel.options).map(o => o.text.trim());
            }})()"#,
            sel = js_string(selector)
        );
        let value = self.page.evaluate(js).await?;
        value
            .into_value::<Option<Vec<String>>>()
            .map_err(|e| Error::Cdp(format!("unexpected option list: {}", e)))?
            .ok_or_else(|| Error::ElementNotFound(selector.to_string()))
    }

    /// Select the option whose visible text is `label` and fire `change`
    pub async fn select_by_text(&self, selector: &str, label: &str) -> Result<()> {
        self.wait_for(selector, self.element_timeout).await?;

        let js = format!(
            r#"(() => {{
                const sel = document.querySelector({sel});
                if (!sel) return false;
                const opt = Array.from(sel.options).find(o => o.text.trim() === {label});
                if (!opt) return false;
                sel.value = opt.value;
                sel.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            sel = js_string(selector),
            label = js_string(label)
        );

        if self.eval_bool(&js).await? {
            Ok(())
        } else {
            Err(Error::ElementNotFound(format!("{} option '{}'", selector, label)))
        }
    }

    async fn eval_bool(&self, js: &str) -> Result<bool> {
        let value = self.page.evaluate(js).await?;
        Ok(value.into_value::<bool>().unwrap_or(false))
    }

    async fn text_of(&self, selector: &str) -> Result<String> {
        let element = self.wait_for(selector, self.element_timeout).await?;
        Ok(element.inner_text().await?.unwrap_or_default())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self.wait_for(selector, self.element_timeout).await?;
        element.click().await?;
        Ok(())
    }

    /// Go to the catalog entry page and wait for its search field
    pub async fn open_catalog_page(&self, timeout: Duration) -> Result<()> {
        self.goto(&self.catalog_url)
            .await
            .map_err(|e| Error::Navigation(e.to_string()))?;

        self.wait_for(&self.locators.search_field, timeout)
            .await
            .map(|_| ())
            .map_err(|_| {
                Error::Navigation(format!(
                    "search field {} did not appear within {}s",
                    self.locators.search_field,
                    timeout.as_secs()
                ))
            })
    }
}

#[async_trait]
impl CatalogPage for BrowserPage {
    async fn fill_search(&mut self, text: &str) -> repricer_core::Result<()> {
        Ok(self.clear_and_type(&self.locators.search_field, text).await?)
    }

    async fn select_category(&mut self, label: &str) -> repricer_core::Result<()> {
        Ok(self.select_by_text(&self.locators.category_select, label).await?)
    }

    async fn set_options(&mut self) -> repricer_core::Result<Vec<String>> {
        Ok(self.select_options(&self.locators.set_select).await?)
    }

    async fn select_set(&mut self, label: &str) -> repricer_core::Result<()> {
        Ok(self.select_by_text(&self.locators.set_select, label).await?)
    }

    async fn wait_for_results(&mut self, timeout: Duration) -> repricer_core::Result<bool> {
        Ok(self.appears(&self.locators.results_marker, timeout).await)
    }

    async fn current_price_text(&mut self) -> repricer_core::Result<String> {
        Ok(self.text_of(&self.locators.current_price).await?)
    }

    async fn fill_price(&mut self, price: &str) -> repricer_core::Result<()> {
        Ok(self.clear_and_type(&self.locators.price_input, price).await?)
    }

    async fn fill_quantity(&mut self, quantity: u32) -> repricer_core::Result<()> {
        Ok(self
            .clear_and_type(&self.locators.quantity_input, &quantity.to_string())
            .await?)
    }

    async fn save(&mut self) -> repricer_core::Result<()> {
        Ok(self.click(&self.locators.save_button).await?)
    }

    async fn open_catalog(&mut self, timeout: Duration) -> repricer_core::Result<()> {
        Ok(self.open_catalog_page(timeout).await?)
    }
}

/// Quote `s` as a JavaScript string literal
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}
