pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod products;
pub mod report;
pub mod settings;
pub mod text;

pub use app_config::AppConfig;
pub use catalog::{AddOutcome, ProductCatalog, SaveOutcome};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{CatalogError, ConfigError, CoreError};
pub use products::{PriceStatus, Product, ProductInfo, ProductPrice, INFO_NOT_FOUND};
pub use report::{chart_batches, price_series, PriceSeries};
pub use settings::{load_settings, save_settings, Settings};
pub use text::clean_text;
