use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to start a WebDriver session at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("WebDriver command failed: {0}")]
    Command(String),

    /// The element was detached from the page between lookup and use.
    #[error("stale element reference")]
    StaleElement,
}

#[derive(Debug, Error)]
pub enum ScraperError {
    /// Every resolution tier was tried without a confident match.
    #[error("product not found: {query}")]
    ProductNotFound { query: String },

    /// The product page shows neither a price nor an unavailability notice.
    #[error("no price or availability information on {url}")]
    ProductPriceNotFound { url: String },

    #[error("invalid volume label {raw:?}")]
    InvalidVolume { raw: String },

    #[error("invalid price {raw:?}")]
    InvalidPrice { raw: String },

    #[error("required element missing from page: {locator}")]
    MissingElement { locator: String },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}
