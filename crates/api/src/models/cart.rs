//! Cart types.

use serde::{Deserialize, Serialize};

use shopsmart_core::ProductId;

use super::ProductSummary;

/// One cart line with the product it refers to.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    #[sqlx(flatten)]
    pub product: ProductSummary,
    pub quantity: i32,
}

/// Body of `POST /api/cart`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Body of `POST /api/cart/add` and `POST /api/cart/remove`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub product_id: ProductId,
}

/// Body of `POST /api/cart/update`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdate {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Body of `PUT /api/cart/{productId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetQuantity {
    pub quantity: i32,
}
