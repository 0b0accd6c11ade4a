//! Wire types for storefront collections.

use serde::{Deserialize, Serialize};

/// Backend-assigned product identifier.
pub type ProductId = u64;

/// Product category identifier.
pub type CategoryId = u64;

/// Supplier identifier.
pub type SupplierId = u64;

/// A product as stored by the backend.
///
/// `category` and `search_key` are display fields filled in client-side
/// by enrichment; the backend tolerates them on writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Absent until the backend has created the product.
    #[serde(default)]
    pub id: Option<ProductId>,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_in_stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_key: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supplier_ids: Vec<SupplierId>,
}

impl Product {
    /// Whether this product lists the given supplier.
    pub fn is_supplied_by(&self, supplier: SupplierId) -> bool {
        self.supplier_ids.contains(&supplier)
    }
}

/// A product category (dimension record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A supplier (dimension record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_new_serializes_null_id() {
        let product = Product {
            product_name: "Hammer".to_string(),
            price: Some(8.9),
            category_id: Some(3),
            ..Default::default()
        };
        let value = serde_json::to_value(&product).unwrap();

        assert!(value["id"].is_null());
        assert_eq!(value["productName"], "Hammer");
        assert_eq!(value["categoryId"], 3);
        assert!(value.get("description").is_none());
        assert!(value.get("supplierIds").is_none());
    }

    #[test]
    fn test_product_deserializes_camel_case() {
        let product: Product = serde_json::from_value(json!({
            "id": 5,
            "productName": "Hammer",
            "productCode": "TBX-0048",
            "price": 8.9,
            "categoryId": 3,
            "quantityInStock": 8,
            "supplierIds": [5, 6]
        }))
        .unwrap();

        assert_eq!(product.id, Some(5));
        assert_eq!(product.product_code.as_deref(), Some("TBX-0048"));
        assert_eq!(product.quantity_in_stock, Some(8));
        assert!(product.is_supplied_by(6));
        assert!(!product.is_supplied_by(1));
        assert!(product.search_key.is_empty());
    }

    #[test]
    fn test_supplier_optional_fields() {
        let supplier: Supplier =
            serde_json::from_value(json!({ "id": 1, "name": "Acme Gardening Supply" })).unwrap();
        assert_eq!(supplier.cost, None);
        assert_eq!(supplier.min_quantity, None);
    }
}
