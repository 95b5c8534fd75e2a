//! Catalog data acquisition
//!
//! Two layers:
//! - [`CatalogBackend`]: one concrete tier (Postgres, REST, bundled data). May fail.
//! - [`DataSource`]: what views consume. Never fails; see [`ResilientSource`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::aggregates::{CatalogRecord, CatalogSnapshot};

pub mod fallback;
pub mod postgres;
pub mod resilient;
pub mod rest;

pub use fallback::StaticCatalog;
pub use postgres::PostgresCatalog;
pub use resilient::ResilientSource;
pub use rest::RestCatalog;

/// Default number of related items returned for a reference record.
pub const DEFAULT_SIMILAR_LIMIT: usize = 4;
/// Largest related-items page the service will serve.
pub const MAX_SIMILAR_LIMIT: usize = 24;

/// Every way a backend can be unavailable.
///
/// Callers treat all variants the same way (substitute the fallback); the
/// split only exists for diagnostics.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Malformed catalog payload: {0}")]
    Malformed(String),

    #[error("Catalog request timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// "Same category, not this record, in stock, at most `limit`".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimilarQuery {
    pub category: String,
    pub exclude_id: String,
    pub limit: usize,
}

impl SimilarQuery {
    pub fn new(category: impl Into<String>, exclude_id: impl Into<String>) -> Self {
        Self { category: category.into(), exclude_id: exclude_id.into(), limit: DEFAULT_SIMILAR_LIMIT }
    }

    pub fn for_record(reference: &CatalogRecord) -> Self { Self::new(&reference.category, &reference.id) }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn admits(&self, record: &CatalogRecord) -> bool {
        record.category == self.category && record.id != self.exclude_id
    }

    /// Drops anything the query would not admit and caps the length. Order is
    /// left as the source produced it.
    pub fn constrain(&self, records: Vec<CatalogRecord>) -> Vec<CatalogRecord> {
        records.into_iter().filter(|r| self.admits(r)).take(self.limit).collect()
    }
}

/// A single catalog tier.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// In-stock records, newest first.
    async fn fetch_catalog(&self) -> SourceResult<Vec<CatalogRecord>>;

    async fn fetch_similar(&self, query: &SimilarQuery) -> SourceResult<Vec<CatalogRecord>>;
}

/// Infallible snapshot provider consumed by views.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_catalog(&self) -> CatalogSnapshot;

    async fn fetch_similar(&self, query: &SimilarQuery) -> CatalogSnapshot;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_similar_query_constrain() {
        let at = Utc::now();
        let reference = CatalogRecord::new("h1", "Argan Oil", "hair", 5_000, 3, at);
        let query = SimilarQuery::for_record(&reference).with_limit(2);
        assert_eq!(query.limit, 2);
        let records = vec![
            reference.clone(),
            CatalogRecord::new("f1", "Face Mask", "face", 3_000, 3, at),
            CatalogRecord::new("h2", "Shampoo", "hair", 4_000, 3, at),
            CatalogRecord::new("h3", "Conditioner", "hair", 4_500, 3, at),
            CatalogRecord::new("h4", "Hair Mask", "hair", 6_000, 3, at),
        ];
        let ids: Vec<_> = query.constrain(records).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["h2", "h3"]);
    }

    #[test]
    fn test_zero_limit_is_empty() {
        let at = Utc::now();
        let query = SimilarQuery::new("hair", "x").with_limit(0);
        assert!(query.constrain(vec![CatalogRecord::new("h", "H", "hair", 1, 1, at)]).is_empty());
    }
}
