//! Aggregates module
pub mod product;
pub mod snapshot;

pub use product::CatalogRecord;
pub use snapshot::{CatalogSnapshot, Provenance};
