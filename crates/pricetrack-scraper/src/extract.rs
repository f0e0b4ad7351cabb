//! Reading product fields off a product page.

use chrono::NaiveDate;
use pricetrack_core::{PriceStatus, ProductInfo, ProductPrice, INFO_NOT_FOUND};

use crate::browser::{Browser, Element, Locator};
use crate::error::{BrowserError, ScraperError};
use crate::parse::{clean_text, parse_price, parse_volume_ml};
use crate::selectors::Selectors;

/// Which parts of a product page to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fields {
    #[default]
    All,
    /// Name, description and brand.
    Description,
    Prices,
}

impl Fields {
    fn includes_description(self) -> bool {
        matches!(self, Fields::All | Fields::Description)
    }

    fn includes_prices(self) -> bool {
        matches!(self, Fields::All | Fields::Prices)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    selectors: Selectors,
}

impl Extractor {
    #[must_use]
    pub fn new(selectors: Selectors) -> Self {
        Self { selectors }
    }

    /// Clicks the cookie-consent close button when the overlay is shown.
    ///
    /// Failures are logged and ignored: the overlay only gets in the way of
    /// clicks, never of reads.
    pub async fn dismiss_cookie_banner<B: Browser>(&self, browser: &B) {
        let result = match browser.find(self.selectors.cookie_dismiss).await {
            Ok(Some(button)) => button.click().await,
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "could not dismiss cookie banner");
        }
    }

    /// Reads the requested `fields` from the current product page.
    ///
    /// Text fields missing from the page are recorded as
    /// [`INFO_NOT_FOUND`]. Fields not requested stay empty.
    ///
    /// # Errors
    ///
    /// Price reading errors from [`Extractor::read_prices`], and any
    /// [`ScraperError::Browser`] failure.
    pub async fn extract<B: Browser>(
        &self,
        browser: &B,
        fields: Fields,
        date: NaiveDate,
    ) -> Result<ProductInfo, ScraperError> {
        self.dismiss_cookie_banner(browser).await;

        let mut info = ProductInfo::default();
        if fields.includes_description() {
            info.product_name = self.read_text(browser, self.selectors.product_name).await?;
            info.description = self.read_text(browser, self.selectors.description).await?;
            info.brand = self.read_text(browser, self.selectors.brand).await?;
        }
        if fields.includes_prices() {
            info.prices = self.read_prices(browser, date).await?;
        }
        Ok(info)
    }

    async fn read_text<B: Browser>(
        &self,
        browser: &B,
        locator: Locator<'_>,
    ) -> Result<String, BrowserError> {
        match browser.find(locator).await? {
            Some(element) => Ok(clean_text(&element.inner_html().await?)),
            None => {
                tracing::warn!(%locator, "field missing from product page");
                Ok(INFO_NOT_FOUND.to_string())
            }
        }
    }

    /// Reads one price observation per purchasable size, dated `date`.
    ///
    /// The variant list is preferred; without it the single displayed price
    /// is used. A page showing only the out-of-stock notice yields a single
    /// unavailable observation.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidVolume`] / [`ScraperError::InvalidPrice`]
    ///   when a label cannot be parsed.
    /// - [`ScraperError::ProductPriceNotFound`] when the page shows neither
    ///   a price nor the out-of-stock notice.
    pub async fn read_prices<B: Browser>(
        &self,
        browser: &B,
        date: NaiveDate,
    ) -> Result<Vec<ProductPrice>, ScraperError> {
        if let Some(list) = browser.find(self.selectors.variant_list).await? {
            let entries = list.find_all(self.selectors.variant_entry).await?;
            if !entries.is_empty() {
                let mut prices = Vec::with_capacity(entries.len());
                for entry in &entries {
                    let volume = read_volume(entry.find(self.selectors.variant_volume).await?).await?;
                    if volume.is_none() && entries.len() > 1 {
                        // shares the (date, None) key with any other unlabelled entry
                        tracing::warn!(
                            url = %browser.current_url().await?,
                            "variant without a volume label"
                        );
                    }
                    let price = match entry.find(self.selectors.variant_price).await? {
                        Some(element) => read_amount(&element).await?,
                        None => PriceStatus::Unknown,
                    };
                    prices.push(ProductPrice {
                        price,
                        volume,
                        date,
                    });
                }
                return Ok(prices);
            }
        }

        if let Some(element) = browser.find(self.selectors.selected_price).await? {
            let price = read_amount(&element).await?;
            let volume = read_volume(browser.find(self.selectors.selected_volume).await?).await?;
            return Ok(vec![ProductPrice {
                price,
                volume,
                date,
            }]);
        }

        if browser.find(self.selectors.unavailable_notice).await?.is_some() {
            return Ok(vec![ProductPrice::unavailable(None, date)]);
        }

        Err(ScraperError::ProductPriceNotFound {
            url: browser.current_url().await?,
        })
    }
}

async fn read_volume<E: Element>(label: Option<E>) -> Result<Option<u32>, ScraperError> {
    match label {
        Some(element) => Ok(Some(parse_volume_ml(&element.inner_html().await?)?)),
        None => Ok(None),
    }
}

/// Prefers the machine-readable `content` attribute over the displayed text.
/// An empty value means the site rendered no price for this entry.
async fn read_amount<E: Element>(element: &E) -> Result<PriceStatus, ScraperError> {
    let raw = match element.attr("content").await? {
        Some(content) => content,
        None => element.inner_html().await?,
    };
    if clean_text(&raw).is_empty() {
        return Ok(PriceStatus::Unknown);
    }
    Ok(PriceStatus::Observed(parse_price(&raw)?))
}
