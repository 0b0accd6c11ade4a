//! Join products with their categories.

use storefront_api::{Product, ProductCategory};
use tracing::error;

use crate::{Catalog, CatalogError, Replay, combine_latest};

/// Display price multiplier applied during enrichment.
pub const DEFAULT_PRICE_MULTIPLIER: f64 = 1.5;

/// Enrich one product: resolve its category name, scale its price and set
/// its search key to its display name.
///
/// A product whose category is absent from `categories` (or that has no
/// category id at all) is an error; the field is never left blank.
pub fn enrich_product(
    product: &Product,
    categories: &[ProductCategory],
    price_multiplier: f64,
) -> Result<Product, CatalogError> {
    let category = categories
        .iter()
        .find(|c| product.category_id == Some(c.id))
        .ok_or(CatalogError::MissingCategory {
            product_id: product.id,
            category_id: product.category_id,
        })?;

    Ok(Product {
        price: product.price.map(|p| p * price_multiplier),
        category: Some(category.name.clone()),
        search_key: vec![product.product_name.clone()],
        ..product.clone()
    })
}

/// Enrich a whole product list.
pub fn enrich_products(
    products: &[Product],
    categories: &[ProductCategory],
    price_multiplier: f64,
) -> Result<Catalog, CatalogError> {
    products
        .iter()
        .map(|p| enrich_product(p, categories, price_multiplier))
        .collect()
}

/// Combine-latest join of the product and category cells.
///
/// Re-enriches from the raw products whenever either input re-emits.
pub fn enrich(
    products: &Replay<Vec<Product>>,
    categories: &Replay<Vec<ProductCategory>>,
    price_multiplier: f64,
) -> Replay<Catalog> {
    combine_latest(products, categories, move |products, categories| {
        enrich_products(products, categories, price_multiplier).inspect_err(|e| {
            error!(error = %e, "product enrichment failed");
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Signal;
    use pretty_assertions::assert_eq;

    fn categories() -> Vec<ProductCategory> {
        vec![
            ProductCategory {
                id: 1,
                name: "Garden".to_string(),
                description: None,
            },
            ProductCategory {
                id: 3,
                name: "Toolbox".to_string(),
                description: None,
            },
        ]
    }

    fn product(id: u64, category_id: Option<u64>, price: Option<f64>) -> Product {
        Product {
            id: Some(id),
            product_name: format!("Product {id}"),
            price,
            category_id,
            ..Default::default()
        }
    }

    #[test]
    fn test_enrich_product_fields() {
        let enriched = enrich_product(&product(1, Some(3), Some(10.0)), &categories(), 1.5).unwrap();

        assert_eq!(enriched.price, Some(15.0));
        assert_eq!(enriched.category.as_deref(), Some("Toolbox"));
        assert_eq!(enriched.search_key, vec!["Product 1".to_string()]);
        assert_eq!(enriched.id, Some(1));
    }

    #[test]
    fn test_enrich_product_without_price() {
        let enriched = enrich_product(&product(2, Some(1), None), &categories(), 1.5).unwrap();
        assert_eq!(enriched.price, None);
        assert_eq!(enriched.category.as_deref(), Some("Garden"));
    }

    #[test]
    fn test_missing_category_fails() {
        let err = enrich_product(&product(4, Some(99), Some(1.0)), &categories(), 1.5).unwrap_err();
        assert_eq!(
            err,
            CatalogError::MissingCategory {
                product_id: Some(4),
                category_id: Some(99),
            }
        );
    }

    #[test]
    fn test_absent_category_id_fails() {
        let result = enrich_product(&product(5, None, Some(1.0)), &categories(), 1.5);
        assert!(matches!(result, Err(CatalogError::MissingCategory { .. })));
    }

    #[test]
    fn test_enrich_products_keeps_order() {
        let products = vec![product(2, Some(1), None), product(1, Some(3), None)];
        let catalog = enrich_products(&products, &categories(), 1.0).unwrap();
        assert_eq!(catalog.ids(), vec![Some(2), Some(1)]);
    }

    #[tokio::test]
    async fn test_enrich_recomputes_on_category_change() {
        let (products, _products_tx) =
            Replay::channel(Signal::Value(vec![product(1, Some(3), Some(10.0))]));
        let (cats, cats_tx) = Replay::channel(Signal::Value(categories()));
        let enriched = enrich(&products, &cats, 1.5);

        let mut sub = enriched.subscribe();
        let first = sub.next().await.unwrap().unwrap();
        assert_eq!(first[0].category.as_deref(), Some("Toolbox"));

        let mut renamed = categories();
        renamed[1].name = "Tools".to_string();
        cats_tx.publish(renamed);

        let second = sub.next().await.unwrap().unwrap();
        assert_eq!(second[0].category.as_deref(), Some("Tools"));
        // Price is scaled from the raw product, not compounded
        assert_eq!(second[0].price, Some(15.0));
    }
}
