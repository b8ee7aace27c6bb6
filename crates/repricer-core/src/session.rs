use crate::Result;
use crate::catalog::CatalogPage;
use async_trait::async_trait;

/// An authenticated browser session on the storefront admin UI
#[async_trait]
pub trait Session: Send {
    type Page: CatalogPage;

    /// The single catalog tab the run works in
    fn page(&mut self) -> &mut Self::Page;

    /// Tear the session down and build a fresh one, logging in again.
    ///
    /// Fails with `Error::Auth` when the new login cannot be confirmed.
    async fn restart(&mut self) -> Result<()>;

    /// Close the browser and free everything the session holds
    async fn release(&mut self);
}
