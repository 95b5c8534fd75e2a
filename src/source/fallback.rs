//! Bundled static catalog

use async_trait::async_trait;
use std::sync::OnceLock;

use super::{CatalogBackend, SimilarQuery, SourceError, SourceResult};
use crate::domain::aggregates::CatalogRecord;

/// Dataset shipped with the build.
const BUNDLED_PRODUCTS: &str = include_str!("../../data/products.json");

/// Catalog backed by a JSON array compiled into the binary.
///
/// The payload is parsed on first use only, and the outcome (including a
/// parse failure) is cached for the lifetime of the value.
#[derive(Debug)]
pub struct StaticCatalog {
    raw: &'static str,
    parsed: OnceLock<Result<Vec<CatalogRecord>, String>>,
}

impl StaticCatalog {
    pub fn bundled() -> Self { Self::from_json(BUNDLED_PRODUCTS) }

    pub fn from_json(raw: &'static str) -> Self { Self { raw, parsed: OnceLock::new() } }

    /// Records in declaration order, including out-of-stock ones.
    pub fn records(&self) -> SourceResult<&[CatalogRecord]> {
        let parsed = self.parsed.get_or_init(|| {
            tracing::debug!("Loading bundled catalog dataset");
            serde_json::from_str::<Vec<CatalogRecord>>(self.raw).map_err(|e| e.to_string())
        });
        parsed.as_deref().map_err(|e| SourceError::Malformed(e.clone()))
    }
}

impl Default for StaticCatalog {
    fn default() -> Self { Self::bundled() }
}

#[async_trait]
impl CatalogBackend for StaticCatalog {
    fn name(&self) -> &'static str { "static" }

    async fn fetch_catalog(&self) -> SourceResult<Vec<CatalogRecord>> {
        Ok(self.records()?.iter().filter(|r| r.is_in_stock()).cloned().collect())
    }

    async fn fetch_similar(&self, query: &SimilarQuery) -> SourceResult<Vec<CatalogRecord>> {
        Ok(self.records()?.iter()
            .filter(|r| r.is_in_stock() && query.admits(r))
            .take(query.limit)
            .cloned()
            .collect())
    }
}
