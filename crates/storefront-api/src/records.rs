//! Collection path constants.

/// Backend collection holding products.
pub const PRODUCT_COLLECTION: &str = "products";

/// Backend collection holding product categories.
pub const PRODUCT_CATEGORY_COLLECTION: &str = "productCategories";

/// Backend collection holding suppliers.
pub const SUPPLIER_COLLECTION: &str = "suppliers";

/// Default backend base URL (the dev server's in-memory web API).
pub const DEFAULT_BASE_URL: &str = "http://localhost:4200/api";
