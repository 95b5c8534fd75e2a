//! OpenSASE Storefront - Product Discovery Pipeline
//!
//! Lists purchasable items, lets visitors search/filter/sort them and shows
//! "similar item" recommendations.
//!
//! ## Features
//! - Remote catalog (Postgres or REST) with transparent fallback to a bundled dataset
//! - Pure query engine: search, category, price range, availability, sort
//! - Facet counts over a versioned category taxonomy
//! - Recommendation resolver that discards stale responses

pub mod api;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod source;
pub mod view;

pub use catalog::{CatalogIndex, FacetCounts, FilterCriteria, SortPolicy};
pub use config::{Backend, Config, ConfigError};
pub use domain::aggregates::{CatalogRecord, CatalogSnapshot, Provenance};
pub use source::{CatalogBackend, DataSource, ResilientSource, SimilarQuery, SourceError, SourceResult};
pub use view::{CatalogView, LoadState, RecommendationResolver};
