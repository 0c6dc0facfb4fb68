//! Order types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopsmart_core::{AccountId, Money, OrderId, OrderStatus, ProductId};

use super::AccountSummary;

/// A placed order with its line items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub account_id: AccountId,
    pub items: Vec<OrderItem>,
    pub total: Money,
    pub payment_method: String,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item. `price` is the unit price captured when the order was placed.
///
/// `name` and `image` come from the live catalog and are absent once the
/// product has been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// An order together with its owner's contact details.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithAccount {
    #[serde(flatten)]
    pub order: Order,
    pub account: Option<AccountSummary>,
}

/// One requested line of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub payment_method: String,
    #[serde(default)]
    pub cart_items: Vec<OrderLineRequest>,
}

/// Body of `PUT /api/orders/admin/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatus {
    pub status: String,
}
