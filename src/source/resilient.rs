//! Remote-then-fallback composition

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::{CatalogBackend, DataSource, SimilarQuery, SourceError, SourceResult};
use crate::domain::aggregates::{CatalogRecord, CatalogSnapshot};

pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tries the primary backend under a timeout and, on any failure, serves the
/// fallback backend's answer instead. The two are never merged.
///
/// Each call decides independently; a failed primary is not remembered.
#[derive(Clone)]
pub struct ResilientSource {
    primary: Option<Arc<dyn CatalogBackend>>,
    fallback: Arc<dyn CatalogBackend>,
    timeout: Duration,
}

impl ResilientSource {
    pub fn new(primary: Arc<dyn CatalogBackend>, fallback: Arc<dyn CatalogBackend>) -> Self {
        Self { primary: Some(primary), fallback, timeout: DEFAULT_REMOTE_TIMEOUT }
    }

    /// No remote tier; every snapshot is tagged `fallback`.
    pub fn fallback_only(fallback: Arc<dyn CatalogBackend>) -> Self {
        Self { primary: None, fallback, timeout: DEFAULT_REMOTE_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn resolve<'a, P, F, PF, FF>(&'a self, operation: &'static str, primary: P, fallback: F) -> CatalogSnapshot
    where
        P: FnOnce(&'a dyn CatalogBackend) -> PF,
        F: FnOnce(&'a dyn CatalogBackend) -> FF,
        PF: Future<Output = SourceResult<Vec<CatalogRecord>>>,
        FF: Future<Output = SourceResult<Vec<CatalogRecord>>>,
    {
        if let Some(backend) = self.primary.as_deref() {
            let outcome = match tokio::time::timeout(self.timeout, primary(backend)).await {
                Ok(result) => result,
                Err(_) => Err(SourceError::Timeout(self.timeout)),
            };
            match outcome {
                Ok(records) => {
                    tracing::debug!(operation, backend = backend.name(), count = records.len(), "Catalog snapshot loaded");
                    return CatalogSnapshot::remote(records);
                }
                Err(e) => tracing::warn!(operation, backend = backend.name(), error = %e, "Catalog backend unavailable, serving fallback data"),
            }
        } else {
            tracing::debug!(operation, "No remote catalog configured, serving fallback data");
        }

        match fallback(self.fallback.as_ref()).await {
            Ok(records) => CatalogSnapshot::fallback(records),
            Err(e) => {
                tracing::error!(operation, backend = self.fallback.name(), error = %e, "Fallback catalog unavailable, serving empty snapshot");
                CatalogSnapshot::fallback(Vec::new())
            }
        }
    }
}

impl std::fmt::Debug for ResilientSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientSource")
            .field("primary", &self.primary.as_ref().map(|b| b.name()))
            .field("fallback", &self.fallback.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl DataSource for ResilientSource {
    async fn fetch_catalog(&self) -> CatalogSnapshot {
        self.resolve("fetch_catalog", |b| b.fetch_catalog(), |b| b.fetch_catalog()).await
    }

    async fn fetch_similar(&self, query: &SimilarQuery) -> CatalogSnapshot {
        let snapshot = self.resolve("fetch_similar", |b| b.fetch_similar(query), |b| b.fetch_similar(query)).await;
        let provenance = snapshot.provenance();
        CatalogSnapshot::new(query.constrain(snapshot.into_records()), provenance)
    }
}
