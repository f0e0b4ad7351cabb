//! Products and their price history.
//!
//! ## On-disk shape of a price observation
//!
//! ```json
//! { "price": 52.9, "volume": 50, "date": "2024-03-01" }
//! { "price": null, "volume": 100, "date": "2024-03-01", "status": "unavailable" }
//! { "price": null, "volume": null, "date": "2024-03-01", "status": "unknown" }
//! ```
//!
//! Older catalog files carry a looser shape that is still accepted on read:
//! - `price` as a numeric string (`"52.90"` or `"52,90"`),
//! - `price` as a sentinel string: `"Product not available."` means
//!   unavailable, any other non-numeric string means unknown,
//! - `price: null` without a `status` tag means unavailable,
//! - `volume: 0` means the observation has no size dimension.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::text::clean_text;

/// Placeholder recorded for a text field the product page did not expose.
pub const INFO_NOT_FOUND: &str = "Info not found.";

const LEGACY_UNAVAILABLE: &str = "Product not available.";

/// What a single observation says about the price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceStatus {
    /// A price was displayed for this size.
    Observed(f64),
    /// The retailer marked the size (or the whole product) as unavailable.
    Unavailable,
    /// The page was reached but no price could be read.
    Unknown,
}

impl PriceStatus {
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        match self {
            PriceStatus::Observed(amount) => Some(*amount),
            PriceStatus::Unavailable | PriceStatus::Unknown => None,
        }
    }
}

impl fmt::Display for PriceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceStatus::Observed(amount) => write!(f, "{amount:.2}"),
            PriceStatus::Unavailable => write!(f, "not available"),
            PriceStatus::Unknown => write!(f, "price not found"),
        }
    }
}

/// One price observation for one package size on one day.
///
/// `(date, volume)` is the deduplication key within a product's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProductPrice", into = "RawProductPrice")]
pub struct ProductPrice {
    pub price: PriceStatus,
    /// Package size in millilitres. `None` when no size dimension applies,
    /// e.g. the whole product is unavailable.
    pub volume: Option<u32>,
    pub date: NaiveDate,
}

impl ProductPrice {
    #[must_use]
    pub fn observed(amount: f64, volume: Option<u32>, date: NaiveDate) -> Self {
        Self {
            price: PriceStatus::Observed(amount),
            volume,
            date,
        }
    }

    #[must_use]
    pub fn unavailable(volume: Option<u32>, date: NaiveDate) -> Self {
        Self {
            price: PriceStatus::Unavailable,
            volume,
            date,
        }
    }

    #[must_use]
    pub fn unknown(volume: Option<u32>, date: NaiveDate) -> Self {
        Self {
            price: PriceStatus::Unknown,
            volume,
            date,
        }
    }

    /// The natural key used to deduplicate observations.
    #[must_use]
    pub fn key(&self) -> (NaiveDate, Option<u32>) {
        (self.date, self.volume)
    }
}

impl fmt::Display for ProductPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.volume {
            Some(volume) => write!(f, "{}: {} ({volume} ml)", self.date, self.price),
            None => write!(f, "{}: {}", self.date, self.price),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawStatus {
    Observed,
    Unavailable,
    Unknown,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawProductPrice {
    #[serde(default)]
    price: Option<serde_json::Value>,
    #[serde(default)]
    volume: Option<u32>,
    date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<RawStatus>,
}

impl From<RawProductPrice> for ProductPrice {
    fn from(raw: RawProductPrice) -> Self {
        let price = match (raw.price, raw.status) {
            (Some(serde_json::Value::Number(n)), _) => {
                n.as_f64().map_or(PriceStatus::Unknown, PriceStatus::Observed)
            }
            (Some(serde_json::Value::String(s)), _) => legacy_price_string(&s),
            (_, Some(RawStatus::Unknown)) => PriceStatus::Unknown,
            (None | Some(serde_json::Value::Null), _) => PriceStatus::Unavailable,
            (Some(_), _) => PriceStatus::Unknown,
        };

        ProductPrice {
            price,
            volume: raw.volume.filter(|&v| v != 0),
            date: raw.date,
        }
    }
}

impl From<ProductPrice> for RawProductPrice {
    fn from(price: ProductPrice) -> Self {
        let (value, status) = match price.price {
            PriceStatus::Observed(amount) => (
                serde_json::Number::from_f64(amount).map(serde_json::Value::Number),
                None,
            ),
            PriceStatus::Unavailable => (None, Some(RawStatus::Unavailable)),
            PriceStatus::Unknown => (None, Some(RawStatus::Unknown)),
        };

        RawProductPrice {
            price: value,
            volume: price.volume,
            date: price.date,
            status,
        }
    }
}

fn legacy_price_string(s: &str) -> PriceStatus {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case(LEGACY_UNAVAILABLE) {
        return PriceStatus::Unavailable;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .map_or(PriceStatus::Unknown, PriceStatus::Observed)
}

/// Everything read from a product page in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductInfo {
    pub product_name: String,
    pub description: String,
    pub brand: String,
    pub prices: Vec<ProductPrice>,
}

/// A tracked product and its price history.
///
/// Two products are the same item when name, brand and description match
/// case-insensitively once cleaned with [`clean_text`]; the price history is
/// not part of identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_name: String,
    pub description: String,
    pub brand: String,
    #[serde(default)]
    pub prices: Vec<ProductPrice>,
}

impl Product {
    /// Returns `true` if both products refer to the same item on the site.
    #[must_use]
    pub fn is_same_item(&self, other: &Product) -> bool {
        eq_ignore_case(&self.product_name, &other.product_name)
            && eq_ignore_case(&self.brand, &other.brand)
            && eq_ignore_case(&self.description, &other.description)
    }

    /// Appends the observations whose `(date, volume)` is not yet recorded.
    ///
    /// Returns how many observations were appended.
    pub fn add_prices<I>(&mut self, prices: I) -> usize
    where
        I: IntoIterator<Item = ProductPrice>,
    {
        let mut added = 0;
        for price in prices {
            let key = price.key();
            if self.prices.iter().all(|existing| existing.key() != key) {
                self.prices.push(price);
                added += 1;
            }
        }
        added
    }

    /// Folds `other`'s price history into this product.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IdentityMismatch`] if `other` is a different item.
    pub fn merge(&mut self, other: Product) -> Result<usize, CoreError> {
        if !self.is_same_item(&other) {
            return Err(CoreError::IdentityMismatch {
                existing: self.search_name(),
                incoming: other.search_name(),
            });
        }
        Ok(self.add_prices(other.prices))
    }

    /// The text typed into the site's search bar to find this product.
    #[must_use]
    pub fn search_name(&self) -> String {
        format!(
            "{} {}",
            clean_text(&self.brand),
            clean_text(&self.product_name)
        )
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_item(other)
    }
}

impl From<ProductInfo> for Product {
    fn from(info: ProductInfo) -> Self {
        Product {
            product_name: info.product_name,
            description: info.description,
            brand: info.brand,
            prices: info.prices,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.product_name)?;
        writeln!(f, "Brand: {}", self.brand)?;
        write!(f, "Description: {}", self.description)?;
        if self.prices.is_empty() {
            return write!(f, "\nNo price recorded.");
        }
        write!(f, "\nPrices recorded:")?;
        for price in &self.prices {
            write!(f, "\n\t{price}")?;
        }
        Ok(())
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    clean_text(a).to_lowercase() == clean_text(b).to_lowercase()
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
