//! Seed the catalog from a YAML file.
//!
//! The file is a list of products using the same fields as
//! `POST /api/products`:
//!
//! ```yaml
//! - name: Desk Lamp
//!   description: Warm white LED lamp
//!   price: "24.99"
//!   stock: 40
//!   category: Home
//! - name: Notebook
//!   description: A5 dotted notebook
//!   price: "6.50"
//!   stock: 200
//!   category: Stationery
//!   weight: "0.3"
//! ```

use std::path::Path;

use tracing::{error, info};

use shopsmart_api::models::NewProduct;
use shopsmart_api::services::CatalogService;

/// Parse a product seed file.
///
/// # Errors
///
/// Returns an error if the YAML does not describe a list of products.
pub fn parse_products(content: &str) -> Result<Vec<NewProduct>, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Insert every product from `file_path`.
///
/// Each product is validated the same way the API validates it. Invalid
/// entries are reported and skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the database
/// is unreachable.
pub async fn products(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading products from file");
    let content = tokio::fs::read_to_string(path).await?;
    let products = parse_products(&content)?;
    info!(products = products.len(), "Parsed seed file");

    let pool = super::connect().await?;
    let catalog = CatalogService::new(&pool);

    let mut inserted = 0_usize;
    let mut failed = 0_usize;
    for product in &products {
        match catalog.create(product).await {
            Ok(created) => {
                inserted += 1;
                info!(product_id = %created.id, name = %created.name, "Inserted product");
            }
            Err(e) => {
                failed += 1;
                error!(name = %product.name, error = %e, "Skipped product");
            }
        }
    }

    info!("Seeding complete!");
    info!("  Products inserted: {inserted}");
    info!("  Products skipped: {failed}");

    pool.close().await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_parse_products() {
        let yaml = r#"
- name: Desk Lamp
  description: Warm white LED lamp
  price: "24.99"
  stock: 40
  category: Home
- name: Notebook
  description: A5 dotted notebook
  price: 6.5
  category: Stationery
"#;
        let products = parse_products(yaml).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price.amount(), Decimal::from_str("24.99").unwrap());
        assert_eq!(products[1].stock, 0);
        assert!(products[1].image.is_none());
    }

    #[test]
    fn test_parse_rejects_negative_price() {
        let yaml = r#"
- name: Broken
  description: Negative
  price: "-1"
  category: Misc
"#;
        assert!(parse_products(yaml).is_err());
    }
}
