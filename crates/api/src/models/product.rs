//! Catalog product types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopsmart_core::{Money, ProductId};

/// Image used when a product is created without one.
pub const DEFAULT_IMAGE_URL: &str = "https://placehold.co/300x200/cccccc/333333?text=No+Image";

/// Default page size for catalog listings.
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// Upper bound on a requested page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A catalog product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: i32,
    pub category: String,
    pub image: String,
    pub weight: Decimal,
    pub dimensions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The subset of a product shown inside carts, wishlists and account views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub stock: i32,
}

/// A locked product row as seen by the order workflow.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StockSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub stock: i32,
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub stock: i32,
    pub category: String,
    pub image: Option<String>,
    pub weight: Option<Decimal>,
    pub dimensions: Option<String>,
}

/// Body of `PUT /api/products/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub weight: Option<Decimal>,
    pub dimensions: Option<String>,
}

/// Query string of `GET /api/products`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Sortable product columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
    Stock,
    Category,
    CreatedAt,
}

impl SortField {
    /// Parse a client-supplied `sortBy` value. Unknown fields are rejected.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "stock" => Some(Self::Stock),
            "category" => Some(Self::Category),
            "createdAt" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    /// Column name; safe to interpolate into SQL.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::Category => "category",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A validated catalog listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: SortField,
    pub order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl CatalogFilter {
    /// Rows to skip for the requested page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_products: i64,
}
