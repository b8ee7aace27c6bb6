use crate::catalog::CatalogPage;
use crate::pricing::Price;
use crate::{Error, Result};
use std::time::Duration;

/// Price and quantity written for one product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceChange {
    pub old: Price,
    pub new: Price,
    pub quantity: u32,
}

/// Writes the discounted price and quantity for a found product
pub struct DiscountApplier {
    percent: u64,
    save_settle: Duration,
}

impl DiscountApplier {
    pub fn new(percent: u64, save_settle: Duration) -> Self {
        Self {
            percent,
            save_settle,
        }
    }

    /// Read the current price, write the discounted one and the quantity, save.
    ///
    /// Every failure comes back as `Error::Apply`.
    pub async fn apply<P>(&self, page: &mut P, quantity: u32) -> Result<PriceChange>
    where
        P: CatalogPage + ?Sized,
    {
        self.try_apply(page, quantity).await.map_err(|e| match e {
            Error::Apply(msg) => Error::Apply(msg),
            other => Error::Apply(other.to_string()),
        })
    }

    async fn try_apply<P>(&self, page: &mut P, quantity: u32) -> Result<PriceChange>
    where
        P: CatalogPage + ?Sized,
    {
        let text = page.current_price_text().await?;
        let old = Price::parse_currency(&text)?;
        let new = old.percent_off(self.percent);

        page.fill_price(&new.to_string()).await?;
        page.fill_quantity(quantity).await?;
        page.save().await?;

        if !self.save_settle.is_zero() {
            tokio::time::sleep(self.save_settle).await;
        }

        tracing::info!(
            "Price ${} -> ${}, quantity {}",
            old,
            new,
            quantity
        );

        Ok(PriceChange { old, new, quantity })
    }
}
