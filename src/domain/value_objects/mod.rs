//! Value Objects for product discovery

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency every catalog price is denominated in.
pub const CURRENCY: &str = "XAF";

/// Bumped whenever a label is added to or removed from [`KNOWN_CATEGORIES`].
pub const TAXONOMY_VERSION: u32 = 1;

/// Facet id of the synthetic bucket that counts every record.
pub const ALL_CATEGORIES: &str = "all";

/// A category label the storefront knows how to present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryDef {
    pub id: &'static str,
    pub label: &'static str,
}

/// Known category labels, in display order.
pub const KNOWN_CATEGORIES: &[CategoryDef] = &[
    CategoryDef { id: "hair", label: "Hair" },
    CategoryDef { id: "face", label: "Face" },
    CategoryDef { id: "supplements", label: "Supplements" },
    CategoryDef { id: "skincare", label: "Skincare" },
];

pub fn is_known_category(category: &str) -> bool {
    KNOWN_CATEGORIES.iter().any(|c| c.id == category)
}

/// Category filter: everything, or one exact (case-sensitive) label.
///
/// The label is not checked against the taxonomy; selecting an unknown label
/// simply matches the records that carry it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategorySelector {
    #[default]
    All,
    Only(String),
}

impl CategorySelector {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }
}

impl From<String> for CategorySelector {
    fn from(value: String) -> Self {
        if value == ALL_CATEGORIES { Self::All } else { Self::Only(value) }
    }
}

impl From<&str> for CategorySelector {
    fn from(value: &str) -> Self { Self::from(value.to_string()) }
}

impl From<CategorySelector> for String {
    fn from(value: CategorySelector) -> Self {
        match value {
            CategorySelector::All => ALL_CATEGORIES.to_string(),
            CategorySelector::Only(category) => category,
        }
    }
}

/// Inclusive price bounds.
///
/// `min > max` is allowed and yields an empty range rather than being swapped
/// or clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange { pub min: u64, pub max: u64 }

impl PriceRange {
    pub const DEFAULT_MIN: u64 = 0;
    pub const DEFAULT_MAX: u64 = 100_000;

    pub fn new(min: u64, max: u64) -> Self { Self { min, max } }
    pub fn contains(&self, price: u64) -> bool { self.min <= price && price <= self.max }
    pub fn is_empty(&self) -> bool { self.min > self.max }
}

impl Default for PriceRange {
    fn default() -> Self { Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX) }
}

/// Stock level under which a record counts as "low stock".
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Stock availability filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    #[default]
    Any,
    InStock,
    LowStock,
}

impl Availability {
    pub fn matches(&self, stock: u32) -> bool {
        match self {
            Self::Any => true,
            Self::InStock => stock > 0,
            Self::LowStock => stock > 0 && stock < LOW_STOCK_THRESHOLD,
        }
    }
}

impl FromStr for Availability {
    type Err = ParseSelectorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "any" => Ok(Self::Any),
            "in-stock" => Ok(Self::InStock),
            "low-stock" => Ok(Self::LowStock),
            other => Err(ParseSelectorError { kind: "availability", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSelectorError { pub kind: &'static str, pub value: String }
impl std::error::Error for ParseSelectorError {}
impl fmt::Display for ParseSelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "unknown {}: {:?}", self.kind, self.value) }
}
