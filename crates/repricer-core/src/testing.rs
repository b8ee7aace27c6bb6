//! In-memory stand-ins for the browser, used by the unit tests.

use crate::catalog::CatalogPage;
use crate::inventory::InventoryRow;
use crate::prompt::{ManualDecision, Prompt};
use crate::session::Session;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Catalog page backed by a fixed product list
#[derive(Debug, Default)]
pub struct FakePage {
    set_options: Vec<String>,
    products: HashMap<String, String>,
    manual_price: Option<String>,
    navigation_failures: u32,

    search_text: String,
    current: Option<String>,
    price_input: Option<String>,
    quantity_input: Option<u32>,

    pub searches: u32,
    pub price_reads: u32,
    pub navigations: u32,
    pub categories: Vec<String>,
    pub selected_sets: Vec<String>,
    pub saved: Vec<(String, String, u32)>,
}

impl FakePage {
    pub fn new(set_options: &[&str]) -> Self {
        Self {
            set_options: set_options.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    /// A product the search finds, with its displayed price
    pub fn with_product(mut self, name: &str, price: &str) -> Self {
        self.products.insert(name.to_string(), price.to_string());
        self
    }

    /// Price shown when no search succeeded (operator found the product by hand)
    pub fn with_manual_price(mut self, price: &str) -> Self {
        self.manual_price = Some(price.to_string());
        self
    }

    /// Make the next `count` catalog navigations fail
    pub fn failing_navigations(mut self, count: u32) -> Self {
        self.navigation_failures = count;
        self
    }
}

#[async_trait]
impl CatalogPage for FakePage {
    async fn fill_search(&mut self, text: &str) -> Result<()> {
        self.searches += 1;
        self.search_text = text.to_string();
        self.current = None;
        Ok(())
    }

    async fn select_category(&mut self, label: &str) -> Result<()> {
        self.categories.push(label.to_string());
        Ok(())
    }

    async fn set_options(&mut self) -> Result<Vec<String>> {
        Ok(self.set_options.clone())
    }

    async fn select_set(&mut self, label: &str) -> Result<()> {
        if !self.set_options.iter().any(|o| o == label) {
            return Err(Error::Ui(format!("no set option '{}'", label)));
        }
        self.selected_sets.push(label.to_string());
        Ok(())
    }

    async fn wait_for_results(&mut self, _timeout: Duration) -> Result<bool> {
        if self.products.contains_key(&self.search_text) {
            self.current = Some(self.search_text.clone());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn current_price_text(&mut self) -> Result<String> {
        self.price_reads += 1;
        match &self.current {
            Some(name) => Ok(self.products[name].clone()),
            None => self
                .manual_price
                .clone()
                .ok_or_else(|| Error::Ui("price not displayed".to_string())),
        }
    }

    async fn fill_price(&mut self, price: &str) -> Result<()> {
        self.price_input = Some(price.to_string());
        Ok(())
    }

    async fn fill_quantity(&mut self, quantity: u32) -> Result<()> {
        self.quantity_input = Some(quantity);
        Ok(())
    }

    async fn save(&mut self) -> Result<()> {
        let price = self
            .price_input
            .take()
            .ok_or_else(|| Error::Ui("price not filled".to_string()))?;
        let quantity = self
            .quantity_input
            .take()
            .ok_or_else(|| Error::Ui("quantity not filled".to_string()))?;
        let name = self.current.clone().unwrap_or_default();
        self.saved.push((name, price, quantity));
        Ok(())
    }

    async fn open_catalog(&mut self, _timeout: Duration) -> Result<()> {
        self.navigations += 1;
        self.current = None;
        if self.navigation_failures > 0 {
            self.navigation_failures -= 1;
            return Err(Error::Navigation("search field did not appear".to_string()));
        }
        Ok(())
    }
}

/// Session around a [`FakePage`] that counts lifecycle calls
#[derive(Debug)]
pub struct FakeSession {
    pub page: FakePage,
    pub restarts: u32,
    pub releases: u32,
    restart_fails: bool,
}

impl FakeSession {
    pub fn new(page: FakePage) -> Self {
        Self {
            page,
            restarts: 0,
            releases: 0,
            restart_fails: false,
        }
    }

    pub fn failing_restart(mut self) -> Self {
        self.restart_fails = true;
        self
    }
}

#[async_trait]
impl Session for FakeSession {
    type Page = FakePage;

    fn page(&mut self) -> &mut FakePage {
        &mut self.page
    }

    async fn restart(&mut self) -> Result<()> {
        self.restarts += 1;
        if self.restart_fails {
            return Err(Error::Auth("login could not be verified".to_string()));
        }
        self.page.navigation_failures = 0;
        Ok(())
    }

    async fn release(&mut self) {
        self.releases += 1;
    }
}

/// Prompt whose row question always errors
pub struct FailingPrompt;

#[async_trait]
impl Prompt for FailingPrompt {
    async fn wait_for_login(&mut self, _url: &str, _username: &str) -> Result<()> {
        Err(Error::Prompt("stdin closed".to_string()))
    }

    async fn unresolved_row(&mut self, _row: &InventoryRow, _attempts: u32) -> Result<ManualDecision> {
        Err(Error::Prompt("stdin closed".to_string()))
    }
}
