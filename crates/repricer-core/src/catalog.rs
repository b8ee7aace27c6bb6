use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// The storefront's product catalog page, as seen by the resolver and applier.
///
/// Implementations drive a real browser; every method maps to one UI
/// interaction against a known element of the page.
#[async_trait]
pub trait CatalogPage: Send {
    /// Clear the product search field and type `text`
    async fn fill_search(&mut self, text: &str) -> Result<()>;

    /// Select the product line (category) by visible text
    async fn select_category(&mut self, label: &str) -> Result<()>;

    /// Visible texts of the set selector, in displayed order
    async fn set_options(&mut self) -> Result<Vec<String>>;

    /// Select a set option by visible text
    async fn select_set(&mut self, label: &str) -> Result<()>;

    /// Wait for the search results marker; `false` on timeout
    async fn wait_for_results(&mut self, timeout: Duration) -> Result<bool>;

    /// Displayed current price of the found product, as currency text
    async fn current_price_text(&mut self) -> Result<String>;

    async fn fill_price(&mut self, price: &str) -> Result<()>;

    async fn fill_quantity(&mut self, quantity: u32) -> Result<()>;

    /// Submit the price/quantity form
    async fn save(&mut self) -> Result<()>;

    /// Navigate to the catalog entry page and wait for the search field.
    ///
    /// Fails with `Error::Navigation` when the field does not show up in time.
    async fn open_catalog(&mut self, timeout: Duration) -> Result<()>;
}
