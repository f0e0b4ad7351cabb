use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use pricetrack_core::{Product, ProductCatalog, ProductInfo, ProductPrice};
use pricetrack_scraper::{ProductSource, ScraperError};
use tempfile::TempDir;

use super::*;

// ---------------------------------------------------------------------------
// Stub source
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StubSource {
    infos: HashMap<String, ProductInfo>,
    prices: HashMap<String, Vec<ProductPrice>>,
    queries: Vec<String>,
}

impl StubSource {
    fn with_info(mut self, query: &str, info: ProductInfo) -> Self {
        self.infos.insert(query.to_string(), info);
        self
    }

    fn with_prices(mut self, query: &str, prices: Vec<ProductPrice>) -> Self {
        self.prices.insert(query.to_string(), prices);
        self
    }

    fn not_found(query: &str) -> ScraperError {
        ScraperError::ProductNotFound {
            query: query.to_string(),
        }
    }
}

impl ProductSource for StubSource {
    async fn describe(&mut self, query: &str) -> Result<ProductInfo, ScraperError> {
        self.queries.push(query.to_string());
        self.infos
            .get(query)
            .cloned()
            .ok_or_else(|| Self::not_found(query))
    }

    async fn prices(&mut self, query: &str) -> Result<Vec<ProductPrice>, ScraperError> {
        self.queries.push(query.to_string());
        self.prices
            .get(query)
            .cloned()
            .ok_or_else(|| Self::not_found(query))
    }

    async fn lookup(&mut self, query: &str) -> Result<ProductInfo, ScraperError> {
        let mut info = self.describe(query).await?;
        info.prices = self.prices.get(query).cloned().unwrap_or_default();
        Ok(info)
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn info(brand: &str, name: &str, description: &str) -> ProductInfo {
    ProductInfo {
        product_name: name.to_string(),
        description: description.to_string(),
        brand: brand.to_string(),
        prices: Vec::new(),
    }
}

fn product(brand: &str, name: &str) -> Product {
    Product::from(info(brand, name, "Eau de parfum"))
}

fn catalog_in(dir: &TempDir, products: Vec<Product>) -> ProductCatalog {
    let path = dir.path().join("products.json");
    std::fs::write(&path, "[]").unwrap();
    let catalog = ProductCatalog::with_products(path, products).unwrap();
    catalog.save().unwrap();
    catalog
}

fn reload(path: &Path) -> ProductCatalog {
    ProductCatalog::load(path).unwrap()
}

// ---------------------------------------------------------------------------
// split_names
// ---------------------------------------------------------------------------

#[test]
fn split_names_trims_and_skips_blanks() {
    assert_eq!(
        split_names("Chanel No 5; ;Dior Sauvage ;"),
        vec!["Chanel No 5".to_string(), "Dior Sauvage".to_string()]
    );
    assert!(split_names("").is_empty());
}

// ---------------------------------------------------------------------------
// add_products
// ---------------------------------------------------------------------------

#[tokio::test]
async fn adding_a_known_product_merges_into_it() {
    let dir = TempDir::new().unwrap();
    let mut catalog = catalog_in(
        &dir,
        vec![Product::from(info("Chanel", "No 5", "A floral scent"))],
    );
    let source = StubSource::default().with_info("Chanel No 5", info("CHANEL", "no 5", "A floral scent"));

    let report = Tracker::new(&mut catalog, source)
        .add_products(&["Chanel No 5".to_string()])
        .await
        .unwrap();

    assert_eq!(report.merged, 1);
    assert_eq!(report.inserted, 0);
    let saved = reload(catalog.path());
    assert_eq!(saved.len(), 1);
    assert!(saved.products()[0].prices.is_empty());
}

#[tokio::test]
async fn failed_lookup_does_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    let mut catalog = catalog_in(&dir, Vec::new());
    let source = StubSource::default().with_info("Dior Sauvage", info("Dior", "Sauvage", "Eau de toilette"));

    let names = split_names("Unknown Perfume;Dior Sauvage");
    let report = Tracker::new(&mut catalog, source)
        .add_products(&names)
        .await
        .unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(report.failed, vec!["Unknown Perfume".to_string()]);
    assert_eq!(reload(catalog.path()).products()[0].search_name(), "Dior Sauvage");
}

// ---------------------------------------------------------------------------
// take_snapshot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn snapshot_skips_products_that_cannot_be_found() {
    let dir = TempDir::new().unwrap();
    let mut catalog = catalog_in(
        &dir,
        vec![
            product("Chanel", "No 5"),
            product("Guerlain", "Shalimar"),
            product("Dior", "Sauvage"),
        ],
    );
    let source = StubSource::default()
        .with_prices(
            "Chanel No 5",
            vec![ProductPrice::observed(120.0, Some(100), day(1))],
        )
        .with_prices(
            "Dior Sauvage",
            vec![
                ProductPrice::observed(89.9, Some(60), day(1)),
                ProductPrice::observed(119.0, Some(100), day(1)),
            ],
        );

    let report = Tracker::new(&mut catalog, source)
        .take_snapshot()
        .await
        .unwrap();

    assert_eq!(report.checked, 3);
    assert_eq!(report.new_prices, 3);
    assert_eq!(report.failed, vec!["Guerlain Shalimar".to_string()]);

    let saved = reload(catalog.path());
    let counts: Vec<usize> = saved.products().iter().map(|p| p.prices.len()).collect();
    assert_eq!(counts, vec![1, 0, 2]);
}

#[tokio::test]
async fn second_snapshot_on_the_same_day_adds_nothing() {
    let dir = TempDir::new().unwrap();
    let mut catalog = catalog_in(&dir, vec![product("Chanel", "No 5")]);
    let prices = vec![ProductPrice::observed(120.0, Some(100), day(2))];

    let first = Tracker::new(
        &mut catalog,
        StubSource::default().with_prices("Chanel No 5", prices.clone()),
    )
    .take_snapshot()
    .await
    .unwrap();
    let second = Tracker::new(
        &mut catalog,
        StubSource::default().with_prices("Chanel No 5", prices),
    )
    .take_snapshot()
    .await
    .unwrap();

    assert_eq!(first.new_prices, 1);
    assert_eq!(second.new_prices, 0);
    assert_eq!(reload(catalog.path()).products()[0].prices.len(), 1);
}

#[tokio::test]
async fn snapshot_queries_by_search_name() {
    let dir = TempDir::new().unwrap();
    let mut catalog = catalog_in(&dir, vec![product("Dolce &amp; Gabbana", "Light Blue")]);
    let mut source = StubSource::default();

    Tracker::new(&mut catalog, &mut source)
        .take_snapshot()
        .await
        .unwrap();

    assert_eq!(source.queries, vec!["Dolce & Gabbana Light Blue".to_string()]);
}

#[test]
fn snapshot_report_lists_failures() {
    let report = SnapshotReport {
        checked: 2,
        new_prices: 1,
        failed: vec!["Guerlain Shalimar".to_string()],
    };
    assert_eq!(
        report.to_string(),
        "Snapshot taken for 2 product(s): 1 new price(s), failed for: Guerlain Shalimar"
    );
}

// ---------------------------------------------------------------------------
// lookup_products
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lookup_returns_found_products_only() {
    let mut source = StubSource::default()
        .with_info("Dior Sauvage", info("Dior", "Sauvage", "Eau de toilette"))
        .with_prices(
            "Dior Sauvage",
            vec![ProductPrice::observed(89.9, Some(60), day(3))],
        );

    let found = lookup_products(&mut source, &split_names("Dior Sauvage;Nothing")).await;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].prices.len(), 1);
}
