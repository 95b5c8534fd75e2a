//! Catalog view: one snapshot per activation

use std::sync::Arc;
use tokio::sync::watch;

use super::{LoadState, Loader, Tracked};
use crate::catalog::{query, CatalogIndex, FacetCounts, FilterCriteria, SortPolicy};
use crate::domain::aggregates::CatalogRecord;
use crate::source::DataSource;

pub struct CatalogView {
    source: Arc<dyn DataSource>,
    loader: Loader<CatalogIndex>,
}

impl CatalogView {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source, loader: Loader::new() }
    }

    /// Loads a fresh snapshot and indexes it. Activating again while a load is
    /// in flight supersedes the earlier one.
    pub async fn activate(&self) -> LoadState<CatalogIndex> {
        let ticket = self.loader.begin(None);
        let snapshot = self.source.fetch_catalog().await;
        let (provenance, count) = (snapshot.provenance(), snapshot.len());
        if self.loader.complete(ticket, CatalogIndex::new(snapshot)) {
            tracing::info!(%provenance, count, "Catalog view ready");
        } else {
            tracing::debug!(?ticket, "Discarding superseded catalog snapshot");
        }
        self.state()
    }

    /// Drops the current snapshot.
    pub fn deactivate(&self) { self.loader.reset(); }

    pub fn state(&self) -> LoadState<CatalogIndex> { self.loader.state() }

    pub fn subscribe(&self) -> watch::Receiver<Tracked<CatalogIndex>> { self.loader.subscribe() }

    pub fn index(&self) -> Option<Arc<CatalogIndex>> { self.state().ready().cloned() }

    pub fn facets(&self) -> Option<FacetCounts> { self.index().map(|i| i.facets().clone()) }

    /// `None` until the view is ready.
    pub fn query(&self, criteria: &FilterCriteria, sort: SortPolicy) -> Option<Vec<CatalogRecord>> {
        let index = self.index()?;
        Some(query::run(index.snapshot().records(), criteria, sort).into_iter().cloned().collect())
    }

    pub fn find(&self, id: &str) -> Option<CatalogRecord> {
        self.index()?.snapshot().find(id).cloned()
    }
}
