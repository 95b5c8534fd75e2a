//! Postgres catalog backend

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{CatalogBackend, SimilarQuery, SourceError, SourceResult};
use crate::domain::aggregates::CatalogRecord;

const CATALOG_SQL: &str = "SELECT id::text AS id, name, description, category, price, stock, created_at, image_url \
     FROM products WHERE stock > 0 ORDER BY created_at DESC";

const SIMILAR_SQL: &str = "SELECT id::text AS id, name, description, category, price, stock, created_at, image_url \
     FROM products WHERE category = $1 AND id::text <> $2 AND stock > 0 LIMIT $3";

/// Raw `products` row; integer columns are signed on the database side.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: Option<String>,
    category: String,
    price: i64,
    stock: i32,
    created_at: DateTime<Utc>,
    image_url: Option<String>,
}

impl TryFrom<ProductRow> for CatalogRecord {
    type Error = SourceError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = u64::try_from(row.price).map_err(|_| SourceError::Malformed(format!("product {} has negative price {}", row.id, row.price)))?;
        let stock = u32::try_from(row.stock).map_err(|_| SourceError::Malformed(format!("product {} has negative stock {}", row.id, row.stock)))?;
        Ok(CatalogRecord {
            id: row.id, name: row.name, description: row.description.unwrap_or_default(), category: row.category,
            price, stock, created_at: row.created_at, image_url: row.image_url,
        })
    }
}

fn into_records(rows: Vec<ProductRow>) -> SourceResult<Vec<CatalogRecord>> {
    rows.into_iter().map(CatalogRecord::try_from).collect()
}

#[derive(Clone, Debug)]
pub struct PostgresCatalog { db: PgPool }

impl PostgresCatalog {
    pub fn new(db: PgPool) -> Self { Self { db } }
}

#[async_trait]
impl CatalogBackend for PostgresCatalog {
    fn name(&self) -> &'static str { "postgres" }

    async fn fetch_catalog(&self) -> SourceResult<Vec<CatalogRecord>> {
        let rows = sqlx::query_as::<_, ProductRow>(CATALOG_SQL).fetch_all(&self.db).await?;
        into_records(rows)
    }

    async fn fetch_similar(&self, query: &SimilarQuery) -> SourceResult<Vec<CatalogRecord>> {
        let rows = sqlx::query_as::<_, ProductRow>(SIMILAR_SQL)
            .bind(&query.category).bind(&query.exclude_id).bind(query.limit as i64)
            .fetch_all(&self.db).await?;
        into_records(rows)
    }
}
