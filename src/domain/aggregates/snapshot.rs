//! Catalog Snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use super::product::CatalogRecord;

/// Which tier produced a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance { Remote, Fallback }

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Remote => write!(f, "remote"), Self::Fallback => write!(f, "fallback") }
    }
}

/// Immutable, ordered set of records from a single source.
///
/// Snapshots are replaced wholesale, never merged or edited in place.
#[derive(Clone, Debug, Serialize)]
pub struct CatalogSnapshot {
    records: Vec<CatalogRecord>,
    provenance: Provenance,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(records: Vec<CatalogRecord>, provenance: Provenance) -> Self {
        Self { records, provenance, loaded_at: Utc::now() }
    }

    pub fn remote(records: Vec<CatalogRecord>) -> Self { Self::new(records, Provenance::Remote) }
    pub fn fallback(records: Vec<CatalogRecord>) -> Self { Self::new(records, Provenance::Fallback) }

    pub fn records(&self) -> &[CatalogRecord] { &self.records }
    pub fn provenance(&self) -> Provenance { self.provenance }
    pub fn loaded_at(&self) -> DateTime<Utc> { self.loaded_at }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn find(&self, id: &str) -> Option<&CatalogRecord> { self.records.iter().find(|r| r.id == id) }
    pub fn into_records(self) -> Vec<CatalogRecord> { self.records }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_lookup() {
        let at = Utc::now();
        let s = CatalogSnapshot::fallback(vec![
            CatalogRecord::new("a", "A", "hair", 1, 1, at),
            CatalogRecord::new("b", "B", "face", 2, 1, at),
        ]);
        assert_eq!(s.provenance(), Provenance::Fallback);
        assert_eq!(s.len(), 2);
        assert_eq!(s.find("b").map(|r| r.name.as_str()), Some("B"));
        assert!(s.find("z").is_none());
        assert_eq!(serde_json::to_value(Provenance::Remote).unwrap(), "remote");
    }
}
