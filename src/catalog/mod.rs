//! In-memory catalog: facet index and the query engine
pub mod collation;
pub mod index;
pub mod query;

pub use index::{CatalogIndex, Facet, FacetCounts};
pub use query::{FilterCriteria, SortPolicy};
