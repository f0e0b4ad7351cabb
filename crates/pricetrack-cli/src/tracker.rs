//! Catalog use cases: adding products by name and taking price snapshots.
//!
//! Each product is looked up independently. A failed lookup is logged and
//! the batch moves on to the next product; only catalog-level failures end
//! a run early.

use std::fmt;

use pricetrack_core::{AddOutcome, Product, ProductCatalog, SaveOutcome};
use pricetrack_scraper::ProductSource;

/// Splits a `;`-separated list of product names, dropping blank entries.
pub(crate) fn split_names(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct AddReport {
    pub inserted: usize,
    pub merged: usize,
    pub failed: Vec<String>,
}

impl fmt::Display for AddReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} product(s) added, {} already tracked, {} not found",
            self.inserted,
            self.merged,
            self.failed.len()
        )
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SnapshotReport {
    pub checked: usize,
    pub new_prices: usize,
    /// Search names of the products whose lookup failed.
    pub failed: Vec<String>,
}

impl fmt::Display for SnapshotReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Snapshot taken for {} product(s): {} new price(s)",
            self.checked, self.new_prices
        )?;
        if !self.failed.is_empty() {
            write!(f, ", failed for: {}", self.failed.join("; "))?;
        }
        Ok(())
    }
}

pub(crate) struct Tracker<'c, S> {
    catalog: &'c mut ProductCatalog,
    source: S,
}

impl<'c, S: ProductSource> Tracker<'c, S> {
    pub(crate) fn new(catalog: &'c mut ProductCatalog, source: S) -> Self {
        Self { catalog, source }
    }

    /// Looks up each name and inserts or merges the result, saving the
    /// catalog after every successful addition.
    pub(crate) async fn add_products(&mut self, names: &[String]) -> anyhow::Result<AddReport> {
        let mut report = AddReport::default();

        for name in names {
            tracing::info!(query = %name, "looking up product");
            let info = match self.source.describe(name).await {
                Ok(info) => info,
                Err(e) => {
                    tracing::error!(query = %name, error = %e, "failed to add product");
                    report.failed.push(name.clone());
                    continue;
                }
            };

            match self.catalog.add_product(info)? {
                AddOutcome::Inserted => report.inserted += 1,
                AddOutcome::Merged { .. } => report.merged += 1,
            }
            self.save()?;
        }

        Ok(report)
    }

    /// Fetches today's prices for every product in the catalog and appends
    /// the new observations. The catalog is saved once, at the end.
    pub(crate) async fn take_snapshot(&mut self) -> anyhow::Result<SnapshotReport> {
        let mut report = SnapshotReport::default();

        for index in 0..self.catalog.len() {
            let search_name = self.catalog.products()[index].search_name();
            tracing::info!(product = %search_name, "taking price snapshot");
            report.checked += 1;

            match self.source.prices(&search_name).await {
                Ok(prices) => {
                    let added = self.catalog.products_mut()[index].add_prices(prices);
                    tracing::debug!(product = %search_name, added, "prices recorded");
                    report.new_prices += added;
                }
                Err(e) => {
                    tracing::error!(product = %search_name, error = %e, "snapshot failed for product");
                    report.failed.push(search_name);
                }
            }
        }

        self.save()?;
        Ok(report)
    }

    fn save(&self) -> anyhow::Result<()> {
        if self.catalog.save()? == SaveOutcome::RestoredBackup {
            tracing::warn!(path = %self.catalog.path().display(), "catalog not updated, previous contents kept");
        }
        Ok(())
    }
}

/// Looks up every name and returns what was found, logging the failures.
pub(crate) async fn lookup_products<S: ProductSource>(
    source: &mut S,
    names: &[String],
) -> Vec<Product> {
    let mut found = Vec::with_capacity(names.len());
    for name in names {
        match source.lookup(name).await {
            Ok(info) => found.push(Product::from(info)),
            Err(e) => tracing::error!(query = %name, error = %e, "product lookup failed"),
        }
    }
    found
}

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;
