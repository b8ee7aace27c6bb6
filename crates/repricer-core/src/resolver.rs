use crate::catalog::CatalogPage;
use crate::matching::{SetChoice, choose_set_option};
use crate::settings::Timings;
use crate::{Error, Result};

/// Result of one search attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results are showing; carries the set option that was selected
    Found(SetChoice),
    NotFound,
}

/// Locates a card in the catalog by name, category and set
pub struct SearchResolver {
    category: String,
    timings: Timings,
}

impl SearchResolver {
    pub fn new(category: impl Into<String>, timings: Timings) -> Self {
        Self {
            category: category.into(),
            timings,
        }
    }

    /// Fill the search form and wait for results.
    ///
    /// UI errors are reported as `NotFound`; the form is left as filled.
    pub async fn resolve<P>(&self, page: &mut P, card_name: &str, set_name: &str) -> SearchOutcome
    where
        P: CatalogPage + ?Sized,
    {
        match self.try_resolve(page, card_name, set_name).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Error searching for '{}': {}", card_name, e);
                SearchOutcome::NotFound
            }
        }
    }

    async fn try_resolve<P>(
        &self,
        page: &mut P,
        card_name: &str,
        set_name: &str,
    ) -> Result<SearchOutcome>
    where
        P: CatalogPage + ?Sized,
    {
        let card_name = card_name.trim();
        if card_name.is_empty() {
            return Err(Error::NotFound("empty card name".to_string()));
        }

        page.fill_search(card_name).await?;
        page.select_category(&self.category).await?;

        if !self.timings.category_settle.is_zero() {
            tokio::time::sleep(self.timings.category_settle).await;
        }

        let options = page.set_options().await?;
        let choice = choose_set_option(&options, set_name.trim());
        match &choice {
            SetChoice::Exact(_) => {}
            SetChoice::Partial(text) => {
                tracing::info!("Set '{}' not listed; selected partial match '{}'", set_name, text)
            }
            SetChoice::AllSets => tracing::info!(
                "No match for set '{}'; searching all sets instead",
                set_name
            ),
        }
        page.select_set(choice.option_text()).await?;

        if page.wait_for_results(self.timings.results_timeout).await? {
            Ok(SearchOutcome::Found(choice))
        } else {
            tracing::info!("Search results for '{}' not found or timed out", card_name);
            Ok(SearchOutcome::NotFound)
        }
    }
}
