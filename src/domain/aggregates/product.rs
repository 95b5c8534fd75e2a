//! Catalog Record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use crate::domain::value_objects::LOW_STOCK_THRESHOLD;

/// One purchasable item as exposed by the catalog service.
///
/// `price` and `stock` are unsigned, so a payload carrying a negative value
/// fails to decode instead of producing an invalid record. A missing or
/// `null` description decodes as empty, like a NULL column does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub category: String,
    pub price: u64,
    pub stock: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CatalogRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>, price: u64, stock: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(), name: name.into(), description: String::new(), category: category.into(),
            price, stock, created_at, image_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn is_in_stock(&self) -> bool { self.stock > 0 }
    pub fn is_low_stock(&self) -> bool { self.is_in_stock() && self.stock < LOW_STOCK_THRESHOLD }

    /// `needle` must already be case-folded; an empty needle matches everything.
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || caseless::default_case_fold_str(&self.name).contains(needle)
            || caseless::default_case_fold_str(&self.description).contains(needle)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn serum() -> CatalogRecord {
        CatalogRecord::new("p-1", "Gluta Glow Serum", "skincare", 15_000, 4, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
            .with_description("Brightening vitamin C serum")
    }

    #[test]
    fn test_search_matches_name_or_description() {
        let p = serum();
        assert!(p.matches_search(""));
        assert!(p.matches_search("glow"));
        assert!(p.matches_search("vitamin c"));
        assert!(!p.matches_search("collagen"));
    }

    #[test]
    fn test_search_folds_expanding_case() {
        let tea = CatalogRecord::new("t-1", "Weißer Tee", "supplements", 6_000, 8, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let fold = caseless::default_case_fold_str;
        assert!(tea.matches_search(&fold("ß")));
        assert!(tea.matches_search(&fold("SS")));
        assert!(tea.matches_search(&fold("WEISSER")));
    }

    #[test]
    fn test_stock_levels() {
        let mut p = serum();
        assert!(p.is_in_stock() && p.is_low_stock());
        p.stock = 25;
        assert!(!p.is_low_stock());
        p.stock = 0;
        assert!(!p.is_in_stock() && !p.is_low_stock());
    }

    #[test]
    fn test_wire_shape() {
        let json = r#"{"id":"a1","name":"Collagen SUPER","description":"","category":"supplements","price":22000,"stock":12,"created_at":"2024-05-02T10:00:00Z","image_url":"https://cdn.example/c.jpg"}"#;
        let p: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(p.price, 22_000);
        assert_eq!(p.image_url.as_deref(), Some("https://cdn.example/c.jpg"));

        let negative = json.replace("22000", "-1");
        assert!(serde_json::from_str::<CatalogRecord>(&negative).is_err());
    }

    #[test]
    fn test_null_description_decodes_as_empty() {
        let json = r#"{"id":"a2","name":"Argan Oil","description":null,"category":"hair","price":9500,"stock":3,"created_at":"2024-05-02T10:00:00Z"}"#;
        let p: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(p.description, "");
        assert!(p.image_url.is_none());

        let missing = json.replace(r#""description":null,"#, "");
        assert_eq!(serde_json::from_str::<CatalogRecord>(&missing).unwrap(), p);
    }

    #[test]
    fn test_image_url_is_serialized_only_when_present() {
        let plain = serde_json::to_value(serum()).unwrap();
        assert!(plain.get("image_url").is_none());
        let pictured = serde_json::to_value(serum().with_image_url("https://cdn.example/s.jpg")).unwrap();
        assert_eq!(pictured["image_url"], "https://cdn.example/s.jpg");
    }
}
