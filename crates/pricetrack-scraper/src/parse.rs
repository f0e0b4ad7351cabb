//! Turning raw page fragments into volumes and prices.

pub use pricetrack_core::clean_text;

use crate::error::ScraperError;

/// Parses a size label like `"50 ml"` into millilitres.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidVolume`] when the label is not an integer
/// optionally followed by `ml`.
pub fn parse_volume_ml(raw: &str) -> Result<u32, ScraperError> {
    let lower = clean_text(raw).to_lowercase();
    let number = lower.strip_suffix("ml").unwrap_or(&lower).trim();

    number
        .parse::<u32>()
        .map_err(|_| ScraperError::InvalidVolume {
            raw: raw.to_string(),
        })
}

/// Parses a displayed price such as `"89,90 €"` or `"1 020,00"`.
///
/// Spaces and the euro sign are dropped and a decimal comma becomes a point.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidPrice`] when nothing numeric remains.
pub fn parse_price(raw: &str) -> Result<f64, ScraperError> {
    let normalized: String = clean_text(raw)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    normalized
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| ScraperError::InvalidPrice {
            raw: raw.to_string(),
        })
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
