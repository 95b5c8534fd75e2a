//! Related items for the record currently on display

use std::sync::Arc;
use tokio::sync::watch;

use super::{LoadState, Loader, Tracked};
use crate::domain::aggregates::{CatalogRecord, CatalogSnapshot};
use crate::source::{DataSource, SimilarQuery, DEFAULT_SIMILAR_LIMIT};

/// Keyed by the reference record's id: resolving the same id again is a
/// no-op, resolving a different id supersedes whatever is in flight.
///
/// An empty `Ready` snapshot is a normal outcome (nothing related to show).
pub struct RecommendationResolver {
    source: Arc<dyn DataSource>,
    limit: usize,
    loader: Loader<CatalogSnapshot>,
}

impl RecommendationResolver {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source, limit: DEFAULT_SIMILAR_LIMIT, loader: Loader::new() }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub async fn resolve(&self, reference: &CatalogRecord) -> LoadState<CatalogSnapshot> {
        let current = self.state();
        if !current.is_idle() && self.loader.key().as_deref() == Some(reference.id()) {
            return current;
        }

        let ticket = self.loader.begin(Some(reference.id.clone()));
        let query = SimilarQuery::for_record(reference).with_limit(self.limit);
        let snapshot = self.source.fetch_similar(&query).await;
        let (provenance, count) = (snapshot.provenance(), snapshot.len());
        if self.loader.complete(ticket, snapshot) {
            tracing::debug!(reference = %reference.id, %provenance, count, "Recommendations ready");
        } else {
            tracing::debug!(reference = %reference.id, ?ticket, "Discarding recommendations for a superseded reference");
        }
        self.state()
    }

    /// Id of the reference record the current state belongs to.
    pub fn reference_id(&self) -> Option<String> { self.loader.key() }

    pub fn state(&self) -> LoadState<CatalogSnapshot> { self.loader.state() }

    /// Forgets the current reference; the next `resolve` always fetches.
    pub fn clear(&self) { self.loader.reset(); }

    pub fn subscribe(&self) -> watch::Receiver<Tracked<CatalogSnapshot>> { self.loader.subscribe() }
}
