//! Catalog service: listing, lookup and administrator edits.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use shopsmart_core::{Money, ProductId};

use super::ServiceError;
use crate::db::ProductRepository;
use crate::models::product::{
    CatalogFilter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, NewProduct, Product, ProductPage,
    ProductQuery, ProductUpdate, SortField, SortOrder,
};

const MAX_PRICE_EXCLUSIVE: i64 = 10_000_000_000;
const MAX_WEIGHT_EXCLUSIVE: i64 = 1_000_000_000;

/// Catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// One page of products matching the query.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for an unknown sort field or a bad page/limit.
    pub async fn list(&self, query: &ProductQuery) -> Result<ProductPage, ServiceError> {
        let filter = catalog_filter(query)?;
        let (products, total) = self.products.list(&filter).await?;

        Ok(ProductPage {
            products,
            current_page: filter.page,
            total_pages: total_pages(total, filter.limit),
            total_products: total,
        })
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    pub async fn get(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.products
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound("product"))
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if a required field is blank or a number is negative.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, ServiceError> {
        validate_new_product(new)?;
        let product = self.products.create(new).await?;
        info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, ServiceError> {
        validate_update(update)?;
        let product = self
            .products
            .update(id, update)
            .await
            .map_err(|e| ServiceError::from_repository(e, "product"))?;
        info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Remove a product from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), ServiceError> {
        self.products
            .delete(id)
            .await
            .map_err(|e| ServiceError::from_repository(e, "product"))?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

/// Turn raw query parameters into a validated filter.
///
/// # Errors
///
/// Returns `ServiceError::Validation` for an unknown `sortBy`, `page < 1`, or
/// a `limit` outside `1..=100`.
pub fn catalog_filter(query: &ProductQuery) -> Result<CatalogFilter, ServiceError> {
    let non_blank = |s: &Option<String>| {
        s.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    let (sort, order) = match query.sort_by.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let field = SortField::parse(raw)
                .ok_or_else(|| ServiceError::Validation(format!("cannot sort by '{raw}'")))?;
            let order = if query.order.as_deref() == Some("desc") {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            };
            (field, order)
        }
        None => (SortField::CreatedAt, SortOrder::Desc),
    };

    let page = query.page.unwrap_or(1);
    if page < 1 {
        return Err(ServiceError::Validation("page must be at least 1".to_string()));
    }

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(ServiceError::Validation(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    Ok(CatalogFilter {
        search: non_blank(&query.search),
        category: non_blank(&query.category).filter(|c| !c.eq_ignore_ascii_case("all")),
        sort,
        order,
        page,
        limit,
    })
}

fn total_pages(total: i64, limit: u32) -> u32 {
    let limit = i64::from(limit.max(1));
    u32::try_from((total.max(0) + limit - 1) / limit).unwrap_or(u32::MAX)
}

fn require(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_non_negative_stock(stock: i32) -> Result<(), ServiceError> {
    if stock < 0 {
        return Err(ServiceError::Validation("stock cannot be negative".to_string()));
    }
    Ok(())
}

/// Prices are stored as `NUMERIC(12, 2)`.
fn require_storable_price(price: Money) -> Result<(), ServiceError> {
    let amount = price.amount().normalize();
    if amount.scale() > 2 {
        return Err(ServiceError::Validation(
            "price cannot have more than 2 decimal places".to_string(),
        ));
    }
    if amount >= Decimal::from(MAX_PRICE_EXCLUSIVE) {
        return Err(ServiceError::Validation(format!(
            "price must be less than {MAX_PRICE_EXCLUSIVE}"
        )));
    }
    Ok(())
}

/// Weights are stored as `NUMERIC(12, 3)`.
fn require_storable_weight(weight: Decimal) -> Result<(), ServiceError> {
    if weight.is_sign_negative() && !weight.is_zero() {
        return Err(ServiceError::Validation("weight cannot be negative".to_string()));
    }
    let weight = weight.normalize();
    if weight.scale() > 3 || weight >= Decimal::from(MAX_WEIGHT_EXCLUSIVE) {
        return Err(ServiceError::Validation(format!(
            "weight must be below {MAX_WEIGHT_EXCLUSIVE} with at most 3 decimal places"
        )));
    }
    Ok(())
}

fn validate_new_product(new: &NewProduct) -> Result<(), ServiceError> {
    require("name", &new.name)?;
    require("description", &new.description)?;
    require("category", &new.category)?;
    require_storable_price(new.price)?;
    require_non_negative_stock(new.stock)?;
    if let Some(weight) = new.weight {
        require_storable_weight(weight)?;
    }
    Ok(())
}

fn validate_update(update: &ProductUpdate) -> Result<(), ServiceError> {
    if let Some(name) = &update.name {
        require("name", name)?;
    }
    if let Some(description) = &update.description {
        require("description", description)?;
    }
    if let Some(category) = &update.category {
        require("category", category)?;
    }
    if let Some(price) = update.price {
        require_storable_price(price)?;
    }
    if let Some(stock) = update.stock {
        require_non_negative_stock(stock)?;
    }
    if let Some(weight) = update.weight {
        require_storable_weight(weight)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn money(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    fn query() -> ProductQuery {
        ProductQuery::default()
    }

    #[test]
    fn test_default_filter_is_newest_first() {
        let filter = catalog_filter(&query()).unwrap();
        assert_eq!(filter.sort, SortField::CreatedAt);
        assert_eq!(filter.order, SortOrder::Desc);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 8);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_sort_by_defaults_to_ascending() {
        let q = ProductQuery {
            sort_by: Some("price".to_string()),
            ..query()
        };
        let filter = catalog_filter(&q).unwrap();
        assert_eq!(filter.sort, SortField::Price);
        assert_eq!(filter.order, SortOrder::Asc);

        let q = ProductQuery {
            sort_by: Some("price".to_string()),
            order: Some("desc".to_string()),
            ..query()
        };
        assert_eq!(catalog_filter(&q).unwrap().order, SortOrder::Desc);
    }

    #[test]
    fn test_unknown_sort_field_is_rejected() {
        let q = ProductQuery {
            sort_by: Some("password_hash".to_string()),
            ..query()
        };
        assert!(matches!(catalog_filter(&q), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_category_all_and_blank_search_are_ignored() {
        let q = ProductQuery {
            search: Some("  ".to_string()),
            category: Some("All".to_string()),
            ..query()
        };
        let filter = catalog_filter(&q).unwrap();
        assert_eq!(filter.search, None);
        assert_eq!(filter.category, None);
    }

    #[test]
    fn test_page_and_limit_bounds() {
        let q = ProductQuery {
            page: Some(0),
            ..query()
        };
        assert!(catalog_filter(&q).is_err());

        let q = ProductQuery {
            limit: Some(500),
            ..query()
        };
        assert!(catalog_filter(&q).is_err());

        let q = ProductQuery {
            page: Some(3),
            limit: Some(10),
            ..query()
        };
        assert_eq!(catalog_filter(&q).unwrap().offset(), 20);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 8), 0);
        assert_eq!(total_pages(8, 8), 1);
        assert_eq!(total_pages(9, 8), 2);
    }

    #[test]
    fn test_validate_new_product() {
        let mut new = NewProduct {
            name: "Lamp".to_string(),
            description: "A lamp".to_string(),
            price: Money::from_cents(1999).unwrap(),
            stock: 3,
            category: "Home".to_string(),
            image: None,
            weight: None,
            dimensions: None,
        };
        assert!(validate_new_product(&new).is_ok());

        new.category = " ".to_string();
        assert!(validate_new_product(&new).is_err());

        new.category = "Home".to_string();
        new.stock = -1;
        assert!(validate_new_product(&new).is_err());
    }

    #[test]
    fn test_validate_update_checks_only_present_fields() {
        assert!(validate_update(&ProductUpdate::default()).is_ok());
        let update = ProductUpdate {
            name: Some(String::new()),
            ..ProductUpdate::default()
        };
        assert!(validate_update(&update).is_err());
    }

    #[test]
    fn test_price_must_fit_the_price_column() {
        assert!(require_storable_price(money("99999999.99")).is_ok());
        assert!(require_storable_price(money("9999999999.99")).is_ok());
        assert!(require_storable_price(money("12.50000")).is_ok());

        assert!(matches!(
            require_storable_price(money("99999999999999.99")),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            require_storable_price(money("10000000000")),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            require_storable_price(money("19.999")),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_oversized_price_is_rejected_on_create_and_update() {
        let new = NewProduct {
            name: "Yacht".to_string(),
            description: "Large".to_string(),
            price: money("99999999999999.99"),
            stock: 1,
            category: "Marine".to_string(),
            image: None,
            weight: None,
            dimensions: None,
        };
        assert!(matches!(validate_new_product(&new), Err(ServiceError::Validation(_))));

        let update = ProductUpdate {
            price: Some(money("0.001")),
            ..ProductUpdate::default()
        };
        assert!(matches!(validate_update(&update), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_weight_must_fit_the_weight_column() {
        assert!(require_storable_weight(Decimal::from_str("1.250").unwrap()).is_ok());
        assert!(require_storable_weight(Decimal::from_str("-0.5").unwrap()).is_err());
        assert!(require_storable_weight(Decimal::from_str("0.0001").unwrap()).is_err());
    }
}
