#![allow(async_fn_in_trait)]

use std::time::Duration;

use chrono::{Local, NaiveDate};
use pricetrack_core::{ProductInfo, ProductPrice};

use crate::browser::Browser;
use crate::error::ScraperError;
use crate::extract::{Extractor, Fields};
use crate::matching::{FuzzyMatcher, DEFAULT_MATCH_THRESHOLD};
use crate::navigate::Resolver;
use crate::selectors::Selectors;

/// Anything that can look products up by name.
///
/// The tracker only depends on this, so it can run against a stub in tests.
pub trait ProductSource {
    /// Name, description and brand of the product matching `query`.
    async fn describe(&mut self, query: &str) -> Result<ProductInfo, ScraperError>;

    /// Today's prices of the product matching `query`.
    async fn prices(&mut self, query: &str) -> Result<Vec<ProductPrice>, ScraperError>;

    /// Every field of the product matching `query`.
    async fn lookup(&mut self, query: &str) -> Result<ProductInfo, ScraperError>;
}

impl<T: ProductSource> ProductSource for &mut T {
    async fn describe(&mut self, query: &str) -> Result<ProductInfo, ScraperError> {
        (**self).describe(query).await
    }

    async fn prices(&mut self, query: &str) -> Result<Vec<ProductPrice>, ScraperError> {
        (**self).prices(query).await
    }

    async fn lookup(&mut self, query: &str) -> Result<ProductInfo, ScraperError> {
        (**self).lookup(query).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScraperOptions {
    pub match_threshold: f64,
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ScraperOptions {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            wait_timeout: Duration::from_secs(3),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Looks products up on the retailer site through a browser session.
pub struct Scraper<'b, B> {
    browser: &'b B,
    resolver: Resolver,
    extractor: Extractor,
    date: Option<NaiveDate>,
}

impl<'b, B: Browser> Scraper<'b, B> {
    #[must_use]
    pub fn new(browser: &'b B, options: ScraperOptions) -> Self {
        Self::with_selectors(browser, options, Selectors::NOTINO)
    }

    #[must_use]
    pub fn with_selectors(browser: &'b B, options: ScraperOptions, selectors: Selectors) -> Self {
        Self {
            browser,
            resolver: Resolver::new(
                selectors,
                FuzzyMatcher::new(options.match_threshold),
                options.wait_timeout,
                options.poll_interval,
            ),
            extractor: Extractor::new(selectors),
            date: None,
        }
    }

    /// Dates every observation `date` instead of the local current date.
    #[must_use]
    pub fn observed_on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Searches for `query`, opens the matching product page and reads
    /// `fields` from it.
    ///
    /// # Errors
    ///
    /// [`ScraperError::ProductNotFound`] when the search yields no match,
    /// or any extraction error for the product page.
    pub async fn fetch_product_info(
        &self,
        query: &str,
        fields: Fields,
    ) -> Result<ProductInfo, ScraperError> {
        self.extractor.dismiss_cookie_banner(self.browser).await;

        let resolution = self.resolver.resolve(self.browser, query).await?;
        tracing::info!(query, url = %resolution.url, tier = ?resolution.tier, "product page found");

        self.extractor.extract(self.browser, fields, self.today()).await
    }

    /// # Errors
    ///
    /// See [`Scraper::fetch_product_info`].
    pub async fn get_description(&self, query: &str) -> Result<ProductInfo, ScraperError> {
        self.fetch_product_info(query, Fields::Description).await
    }

    /// # Errors
    ///
    /// See [`Scraper::fetch_product_info`].
    pub async fn get_prices(&self, query: &str) -> Result<Vec<ProductPrice>, ScraperError> {
        Ok(self.fetch_product_info(query, Fields::Prices).await?.prices)
    }
}

impl<B: Browser> ProductSource for Scraper<'_, B> {
    async fn describe(&mut self, query: &str) -> Result<ProductInfo, ScraperError> {
        self.get_description(query).await
    }

    async fn prices(&mut self, query: &str) -> Result<Vec<ProductPrice>, ScraperError> {
        self.get_prices(query).await
    }

    async fn lookup(&mut self, query: &str) -> Result<ProductInfo, ScraperError> {
        self.fetch_product_info(query, Fields::All).await
    }
}
