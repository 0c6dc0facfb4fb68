//! Product repository.

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use shopsmart_core::ProductId;

use super::RepositoryError;
use crate::models::product::{
    CatalogFilter, DEFAULT_IMAGE_URL, NewProduct, Product, ProductSummary, ProductUpdate,
    StockSnapshot,
};

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, category, image, weight, \
                               dimensions, created_at, updated_at";

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List one page of products matching `filter`, plus the total match count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &CatalogFilter,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM product");
        push_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {PRODUCT_COLUMNS} FROM product"));
        push_filter(&mut query, filter);
        query
            .push(" ORDER BY ")
            .push(filter.sort.column())
            .push(" ")
            .push(filter.order.keyword())
            .push(", id ")
            .push(filter.order.keyword())
            .push(" LIMIT ")
            .push_bind(i64::from(filter.limit))
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let products = query
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok((products, total))
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product summary by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(&self, id: ProductId) -> Result<Option<ProductSummary>, RepositoryError> {
        let summary = sqlx::query_as::<_, ProductSummary>(
            "SELECT id, name, price, image, stock FROM product WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(summary)
    }

    /// Insert a product. Missing optional fields take their catalog defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO product (name, description, price, stock, category, image, weight, dimensions)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0), COALESCE($8, ''))
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(new.name.trim())
        .bind(&new.description)
        .bind(new.price)
        .bind(new.stock)
        .bind(new.category.trim())
        .bind(new.image.as_deref().unwrap_or(DEFAULT_IMAGE_URL))
        .bind(new.weight)
        .bind(new.dimensions.as_deref().map(str::trim))
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE product
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                stock = COALESCE($5, stock),
                category = COALESCE($6, category),
                image = COALESCE($7, image),
                weight = COALESCE($8, weight),
                dimensions = COALESCE($9, dimensions),
                updated_at = now()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(update.description.as_deref())
        .bind(update.price)
        .bind(update.stock)
        .bind(update.category.as_deref().map(str::trim))
        .bind(update.image.as_deref())
        .bind(update.weight)
        .bind(update.dimensions.as_deref().map(str::trim))
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Cart and wishlist entries go with it; order history stays.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Transaction-scoped stock operations
    // =========================================================================

    /// Lock the given products for update, in ascending ID order.
    ///
    /// IDs that do not exist are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock_stock(
        conn: &mut PgConnection,
        ids: &[ProductId],
    ) -> Result<Vec<StockSnapshot>, RepositoryError> {
        let rows = sqlx::query_as::<_, StockSnapshot>(
            r"
            SELECT id, name, price, stock FROM product
            WHERE id = ANY($1)
            ORDER BY id
            FOR UPDATE
            ",
        )
        .bind(ids)
        .fetch_all(conn)
        .await?;

        Ok(rows)
    }

    /// Take `quantity` units out of stock if at least that many remain.
    ///
    /// Returns `false` when the product is missing or short.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn decrement_stock(
        conn: &mut PgConnection,
        id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE product SET stock = stock - $2, updated_at = now()
            WHERE id = $1 AND stock >= $2
            ",
        )
        .bind(id)
        .bind(quantity)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Put `quantity` units back into stock.
    ///
    /// Returns `false` when the product no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn restore_stock(
        conn: &mut PgConnection,
        id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE product SET stock = stock + $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(quantity)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CatalogFilter) {
    let mut has_where = false;
    let mut clause = |builder: &mut QueryBuilder<'_, Postgres>| {
        builder.push(if has_where { " AND " } else { " WHERE " });
        has_where = true;
    };

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        clause(builder);
        builder
            .push("(name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(category) = &filter.category {
        clause(builder);
        builder
            .push("category ILIKE ")
            .push_bind(format!("%{}%", escape_like(category)));
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
