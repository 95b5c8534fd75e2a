//! Query engine: filter then stable-sort a snapshot
//!
//! Pure functions over borrowed records; nothing here mutates a snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::collation::locale_cmp;
use crate::domain::aggregates::CatalogRecord;
use crate::domain::value_objects::{Availability, CategorySelector, ParseSelectorError, PriceRange};

/// Search, category, price and availability predicates, ANDed together.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub category: CategorySelector,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default)]
    pub availability: Availability,
}

impl FilterCriteria {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn category(mut self, category: impl Into<CategorySelector>) -> Self {
        self.category = category.into();
        self
    }

    pub fn price(mut self, min: u64, max: u64) -> Self {
        self.price_range = PriceRange::new(min, max);
        self
    }

    pub fn availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Back to the storefront defaults: no search, all categories, full price range.
    pub fn reset(&mut self) { *self = Self::default(); }

    fn matcher(&self) -> impl Fn(&CatalogRecord) -> bool + '_ {
        let needle = caseless::default_case_fold_str(&self.search_term);
        move |record| {
            record.matches_search(&needle)
                && self.category.matches(&record.category)
                && self.price_range.contains(record.price)
                && self.availability.matches(record.stock)
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortPolicy {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    Name,
    Stock,
}

impl SortPolicy {
    pub const ALL: [SortPolicy; 5] = [Self::Newest, Self::PriceLow, Self::PriceHigh, Self::Name, Self::Stock];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Name => "name",
            Self::Stock => "stock",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::PriceLow => "Price: low to high",
            Self::PriceHigh => "Price: high to low",
            Self::Name => "Name A-Z",
            Self::Stock => "Stock available",
        }
    }

    fn sort(&self, records: &mut [&CatalogRecord]) {
        // slice::sort_by is stable: ties keep their filtered order
        match self {
            Self::Newest => records.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Self::PriceLow => records.sort_by_key(|r| r.price),
            Self::PriceHigh => records.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::Name => records.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
            Self::Stock => records.sort_by(|a, b| b.stock.cmp(&a.stock)),
        }
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SortPolicy {
    type Err = ParseSelectorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
            .find(|p| p.as_str() == value)
            .ok_or_else(|| ParseSelectorError { kind: "sort policy", value: value.to_string() })
    }
}

/// Records passing `criteria`, in their original relative order.
pub fn filter<'a>(records: &'a [CatalogRecord], criteria: &FilterCriteria) -> Vec<&'a CatalogRecord> {
    let matches = criteria.matcher();
    records.iter().filter(|r| matches(r)).collect()
}

/// Filter, then order by `sort`.
pub fn run<'a>(records: &'a [CatalogRecord], criteria: &FilterCriteria, sort: SortPolicy) -> Vec<&'a CatalogRecord> {
    let mut selected = filter(records, criteria);
    sort.sort(&mut selected);
    selected
}
