//! Catalog Index and facet counts

use serde::Serialize;
use std::sync::Arc;

use crate::domain::aggregates::{CatalogSnapshot, Provenance};
use crate::domain::value_objects::{is_known_category, ALL_CATEGORIES, KNOWN_CATEGORIES, TAXONOMY_VERSION};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub id: &'static str,
    pub label: &'static str,
    pub count: usize,
}

/// Per-category counts for one snapshot, in taxonomy display order with the
/// synthetic `all` bucket first.
///
/// Records whose category is not in the taxonomy count toward `all` and
/// `uncategorized`, never toward a named bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FacetCounts {
    pub taxonomy_version: u32,
    pub facets: Vec<Facet>,
    pub uncategorized: usize,
}

impl FacetCounts {
    pub fn from_snapshot(snapshot: &CatalogSnapshot) -> Self {
        let records = snapshot.records();
        let mut facets = Vec::with_capacity(KNOWN_CATEGORIES.len() + 1);
        facets.push(Facet { id: ALL_CATEGORIES, label: "All products", count: records.len() });
        facets.extend(KNOWN_CATEGORIES.iter().map(|c| Facet {
            id: c.id,
            label: c.label,
            count: records.iter().filter(|r| r.category == c.id).count(),
        }));

        let uncategorized = records.iter().filter(|r| !is_known_category(&r.category)).count();
        if uncategorized > 0 {
            tracing::debug!(uncategorized, taxonomy_version = TAXONOMY_VERSION, "Snapshot contains categories outside the taxonomy");
        }

        Self { taxonomy_version: TAXONOMY_VERSION, facets, uncategorized }
    }

    /// `None` for ids outside the taxonomy.
    pub fn count(&self, id: &str) -> Option<usize> {
        self.facets.iter().find(|f| f.id == id).map(|f| f.count)
    }

    pub fn total(&self) -> usize { self.count(ALL_CATEGORIES).unwrap_or(0) }
}

/// Latest snapshot plus the facets derived from it.
///
/// Built once per snapshot, so counts can never drift from the records.
#[derive(Clone, Debug)]
pub struct CatalogIndex {
    snapshot: Arc<CatalogSnapshot>,
    facets: FacetCounts,
}

impl CatalogIndex {
    pub fn new(snapshot: impl Into<Arc<CatalogSnapshot>>) -> Self {
        let snapshot = snapshot.into();
        let facets = FacetCounts::from_snapshot(&snapshot);
        Self { snapshot, facets }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot { &self.snapshot }
    pub fn provenance(&self) -> Provenance { self.snapshot.provenance() }
    pub fn facets(&self) -> &FacetCounts { &self.facets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::CatalogRecord;
    use chrono::Utc;

    fn snapshot(categories: &[&str]) -> CatalogSnapshot {
        let at = Utc::now();
        CatalogSnapshot::remote(
            categories.iter().enumerate()
                .map(|(i, c)| CatalogRecord::new(i.to_string(), format!("P{i}"), *c, 100, 1, at))
                .collect(),
        )
    }

    #[test]
    fn test_facet_counts() {
        let index = CatalogIndex::new(snapshot(&["hair", "face", "hair", "skincare", "supplements"]));
        let facets = index.facets();
        assert_eq!(facets.total(), 5);
        assert_eq!(facets.count("hair"), Some(2));
        assert_eq!(facets.count("face"), Some(1));
        assert_eq!(facets.count("skincare"), Some(1));
        assert_eq!(facets.count("supplements"), Some(1));
        assert_eq!(facets.uncategorized, 0);
        let order: Vec<_> = facets.facets.iter().map(|f| f.id).collect();
        assert_eq!(order, ["all", "hair", "face", "supplements", "skincare"]);
    }

    #[test]
    fn test_unknown_labels_only_count_toward_all() {
        let index = CatalogIndex::new(snapshot(&["hair", "body", "Hair"]));
        let facets = index.facets();
        assert_eq!(facets.total(), 3);
        assert_eq!(facets.count("hair"), Some(1));
        assert_eq!(facets.count("body"), None);
        assert_eq!(facets.uncategorized, 2);
        let named: usize = facets.facets.iter().skip(1).map(|f| f.count).sum();
        assert_eq!(named + facets.uncategorized, facets.total());
    }

    #[test]
    fn test_empty_snapshot() {
        let facets = CatalogIndex::new(snapshot(&[])).facets().clone();
        assert!(facets.facets.iter().all(|f| f.count == 0));
        assert_eq!(facets.taxonomy_version, TAXONOMY_VERSION);
    }
}
