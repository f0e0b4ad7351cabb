//! The product catalog: an ordered, de-duplicated list of products backed by
//! a single JSON file.
//!
//! The whole file is loaded into memory once and rewritten wholesale on
//! [`ProductCatalog::save`]. There is no concurrent writer, so no locking.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CatalogError, CoreError};
use crate::products::{Product, ProductInfo};

/// Result of [`ProductCatalog::add_product`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// No existing product matched; the candidate was appended.
    Inserted,
    /// An existing product matched and absorbed `new_prices` observations.
    Merged { new_prices: usize },
}

/// Result of [`ProductCatalog::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// Writing failed and the previous file contents were put back.
    RestoredBackup,
}

#[derive(Debug)]
pub struct ProductCatalog {
    path: PathBuf,
    products: Vec<Product>,
}

impl ProductCatalog {
    /// Loads the catalog stored at `path`.
    ///
    /// An empty (or whitespace-only) file is read as an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidExtension`] if `path` does not end in
    /// `.json`, [`CatalogError::Io`] if it cannot be read, or
    /// [`CatalogError::Parse`] if its contents are not a product array.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        ensure_json_extension(&path)?;

        let content = fs::read_to_string(&path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let products: Vec<Product> = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?
        };

        tracing::debug!(path = %path.display(), count = products.len(), "catalog loaded");
        Ok(Self { path, products })
    }

    /// Builds an in-memory catalog that will be saved to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidExtension`] if `path` does not end in `.json`.
    pub fn with_products(
        path: impl Into<PathBuf>,
        products: Vec<Product>,
    ) -> Result<Self, CatalogError> {
        let path = path.into();
        ensure_json_extension(&path)?;
        Ok(Self { path, products })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn products_mut(&mut self) -> &mut [Product] {
        &mut self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Inserts the product described by `info`, or merges it into the first
    /// existing product that refers to the same item.
    ///
    /// # Errors
    ///
    /// Propagates [`CoreError::IdentityMismatch`] from the merge, which only
    /// happens if identity checks disagree with each other.
    pub fn add_product(&mut self, info: ProductInfo) -> Result<AddOutcome, CoreError> {
        let candidate = Product::from(info);

        if let Some(existing) = self.products.iter_mut().find(|p| p.is_same_item(&candidate)) {
            let new_prices = existing.merge(candidate)?;
            tracing::info!(product = %existing.search_name(), new_prices, "product already in the catalog");
            return Ok(AddOutcome::Merged { new_prices });
        }

        tracing::info!(product = %candidate.search_name(), "product added to the catalog");
        self.products.push(candidate);
        Ok(AddOutcome::Inserted)
    }

    /// Rewrites the catalog file with the in-memory products.
    ///
    /// The current file contents are read first; if writing the new contents
    /// fails, the old contents are written back and the failure is logged
    /// rather than returned.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the backup cannot be read before the
    /// write, or cannot be restored after a failed write.
    pub fn save(&self) -> Result<SaveOutcome, CatalogError> {
        self.save_with(|writer, products| {
            serde_json::to_writer_pretty(writer, products).map_err(io::Error::from)
        })
    }

    fn save_with<F>(&self, write_products: F) -> Result<SaveOutcome, CatalogError>
    where
        F: FnOnce(&mut dyn Write, &[Product]) -> io::Result<()>,
    {
        let backup = fs::read(&self.path).map_err(|source| self.io_error(source))?;

        let written = File::create(&self.path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            write_products(&mut writer, &self.products)?;
            writer.flush()
        });

        match written {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), count = self.products.len(), "catalog saved");
                Ok(SaveOutcome::Written)
            }
            Err(err) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to save catalog, restoring previous contents"
                );
                fs::write(&self.path, &backup).map_err(|source| self.io_error(source))?;
                Ok(SaveOutcome::RestoredBackup)
            }
        }
    }

    fn io_error(&self, source: io::Error) -> CatalogError {
        CatalogError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl fmt::Display for ProductCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for product in &self.products {
            write!(f, "{product}\n\n")?;
        }
        write!(f, "Found prices for {} products.", self.products.len())
    }
}

/// Returns an error unless `path` ends in `.json`.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidExtension`] for any other extension.
pub fn ensure_json_extension(path: &Path) -> Result<(), CatalogError> {
    if path.extension().is_some_and(|ext| ext == "json") {
        Ok(())
    } else {
        Err(CatalogError::InvalidExtension {
            path: path.display().to_string(),
        })
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
