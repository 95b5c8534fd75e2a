//! REST catalog backend (PostgREST-style `products` endpoint)

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

use super::{CatalogBackend, SimilarQuery, SourceError, SourceResult};
use crate::domain::aggregates::CatalogRecord;

#[derive(Debug, Clone)]
pub struct RestCatalog {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestCatalog {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> SourceResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url: base_url.into(), api_key })
    }

    fn products_url(&self) -> String {
        format!("{}/rest/v1/products", self.base_url.trim_end_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    fn catalog_request(&self) -> RequestBuilder {
        self.authorized(self.client.get(self.products_url()))
            .query(&[("select", "*"), ("stock", "gt.0"), ("order", "created_at.desc")])
    }

    fn similar_request(&self, query: &SimilarQuery) -> RequestBuilder {
        self.authorized(self.client.get(self.products_url())).query(&[
            ("select", "*".to_string()),
            ("category", format!("eq.{}", query.category)),
            ("id", format!("neq.{}", query.exclude_id)),
            ("stock", "gt.0".to_string()),
            ("limit", query.limit.to_string()),
        ])
    }

    async fn send(request: RequestBuilder) -> SourceResult<Vec<CatalogRecord>> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Service { status: status.as_u16(), body });
        }
        decode(&response.bytes().await?)
    }
}

fn decode(body: &[u8]) -> SourceResult<Vec<CatalogRecord>> {
    serde_json::from_slice(body).map_err(|e| SourceError::Malformed(e.to_string()))
}

#[async_trait]
impl CatalogBackend for RestCatalog {
    fn name(&self) -> &'static str { "rest" }

    async fn fetch_catalog(&self) -> SourceResult<Vec<CatalogRecord>> {
        Self::send(self.catalog_request()).await
    }

    async fn fetch_similar(&self, query: &SimilarQuery) -> SourceResult<Vec<CatalogRecord>> {
        Self::send(self.similar_request(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RestCatalog {
        RestCatalog::new("https://catalog.example.com/", Some("anon-key".into()), Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_catalog_request_shape() {
        let request = catalog().catalog_request().build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://catalog.example.com/rest/v1/products?select=*&stock=gt.0&order=created_at.desc"
        );
        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn test_similar_request_shape() {
        let query = SimilarQuery::new("hair", "p-9").with_limit(3);
        let request = catalog().similar_request(&query).build().unwrap();
        let pairs: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert!(pairs.contains(&("category".into(), "eq.hair".into())));
        assert!(pairs.contains(&("id".into(), "neq.p-9".into())));
        assert!(pairs.contains(&("limit".into(), "3".into())));
    }

    #[test]
    fn test_decode_accepts_null_columns() {
        let body = br#"[
            {"id":"1","name":"Argan Oil","description":null,"category":"hair","price":9500,"stock":4,"created_at":"2024-05-02T10:00:00Z","image_url":null},
            {"id":"2","name":"Gluta Glow","description":"Serum","category":"face","price":18000,"stock":7,"created_at":"2024-05-03T10:00:00Z"}
        ]"#;
        let records = decode(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "");
        assert!(records[0].image_url.is_none());
        assert!(matches!(decode(b"{\"message\":\"nope\"}"), Err(SourceError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        let catalog = RestCatalog::new("http://127.0.0.1:9", None, Duration::from_millis(500)).unwrap();
        assert!(catalog.fetch_catalog().await.is_err());
    }
}
