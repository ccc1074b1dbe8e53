//! Stored-query catalog: query id -> SQL text.
//!
//! Built once at startup from the SQL shipped under `sql/`, optionally
//! layered with a YAML file of overrides. Read-only afterwards.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read query catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid query catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Query '{0}' has empty SQL")]
    EmptyQuery(String),
}

const BUILTIN: &[(&str, &str)] = &[
    ("cart/addItemCart", include_str!("../../sql/cart/addItemCart.sql")),
    ("cart/updateItemCart", include_str!("../../sql/cart/updateItemCart.sql")),
    ("cart/deleteItemCart", include_str!("../../sql/cart/deleteItemCart.sql")),
    ("cart/getItemCartById", include_str!("../../sql/cart/getItemCartById.sql")),
    ("cart/getItemsCartByUserId", include_str!("../../sql/cart/getItemsCartByUserId.sql")),
    ("cart/getCartSummaryByUserId", include_str!("../../sql/cart/getCartSummaryByUserId.sql")),
    ("products/addProduct", include_str!("../../sql/products/addProduct.sql")),
    ("products/updateProduct", include_str!("../../sql/products/updateProduct.sql")),
    ("products/getProductById", include_str!("../../sql/products/getProductById.sql")),
    ("products/getProductsByUserId", include_str!("../../sql/products/getProductsByUserId.sql")),
    ("products/getProductsListing", include_str!("../../sql/products/getProductsListing.sql")),
    ("users/getUserById", include_str!("../../sql/users/getUserById.sql")),
    ("users/updateUserById", include_str!("../../sql/users/updateUserById.sql")),
];

#[derive(Debug, Clone, Default)]
pub struct QueryCatalog {
    entries: HashMap<String, String>,
}

impl QueryCatalog {
    /// Catalog of the queries compiled into the binary
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(id, sql)| (id.to_string(), sql.trim().to_string()))
            .collect();
        Self { entries }
    }

    /// Built-in queries, overridden by the YAML file at `path` when given
    pub fn load(path: Option<&str>) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        if let Some(path) = path {
            let count = catalog.merge_file(Path::new(path))?;
            info!("Loaded {} query override(s) from {}", count, path);
        }
        Ok(catalog)
    }

    fn merge_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: display.clone(),
            source,
        })?;
        self.merge_yaml(&text).map_err(|err| match err {
            CatalogError::Parse { source, .. } => CatalogError::Parse { path: display, source },
            other => other,
        })
    }

    /// Merge a YAML mapping of `query id: SQL`. Returns the number of entries merged.
    pub fn merge_yaml(&mut self, text: &str) -> Result<usize, CatalogError> {
        let overrides: BTreeMap<String, String> = serde_yaml::from_str(text).map_err(|source| CatalogError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;

        for (id, sql) in &overrides {
            if sql.trim().is_empty() {
                return Err(CatalogError::EmptyQuery(id.clone()));
            }
        }

        let count = overrides.len();
        for (id, sql) in overrides {
            self.entries.insert(id, sql.trim().to_string());
        }
        Ok(count)
    }

    pub fn get(&self, query_id: &str) -> Option<&str> {
        self.entries.get(query_id).map(String::as_str)
    }

    pub fn contains(&self, query_id: &str) -> bool {
        self.entries.contains_key(query_id)
    }

    /// Sorted query ids
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
