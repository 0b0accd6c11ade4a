//! Product data service.
//!
//! Wires the fetch sources, enrichment, intake, CRUD worker and selection
//! index into the set of streams presentation code subscribes to.

use std::sync::Arc;

use storefront_api::{
    PRODUCT_CATEGORY_COLLECTION, PRODUCT_COLLECTION, Product, ProductCategory, ProductId,
    SUPPLIER_COLLECTION, Supplier,
};
use tracing::info;

use crate::{
    Catalog, CatalogConfig, CatalogError, Dispatcher, MutationIntake, MutationQueue, Replay,
    SelectionIndex, StorefrontBackend, UpdateRule, combine_latest, enrich, materialize, remote,
};

/// Cached product category list.
pub fn product_categories(backend: &Arc<dyn StorefrontBackend>) -> Replay<Vec<ProductCategory>> {
    let backend = Arc::clone(backend);
    remote(PRODUCT_CATEGORY_COLLECTION, move || async move {
        backend
            .list_categories()
            .await
            .map_err(|e| CatalogError::fetch(PRODUCT_CATEGORY_COLLECTION, &e))
    })
}

/// Cached supplier list.
pub fn suppliers(backend: &Arc<dyn StorefrontBackend>) -> Replay<Vec<Supplier>> {
    let backend = Arc::clone(backend);
    remote(SUPPLIER_COLLECTION, move || async move {
        backend
            .list_suppliers()
            .await
            .map_err(|e| CatalogError::fetch(SUPPLIER_COLLECTION, &e))
    })
}

/// Suppliers of the selected product. Empty when nothing is selected.
pub fn suppliers_for(
    selected: &Replay<Option<Product>>,
    suppliers: &Replay<Vec<Supplier>>,
) -> Replay<Vec<Supplier>> {
    combine_latest(selected, suppliers, |selected, suppliers| {
        Ok(match selected {
            Some(product) => suppliers
                .iter()
                .filter(|s| product.is_supplied_by(s.id))
                .cloned()
                .collect(),
            None => Vec::new(),
        })
    })
}

/// The product data service.
pub struct ProductService {
    products: Replay<Vec<Product>>,
    product_categories: Replay<Vec<ProductCategory>>,
    suppliers: Replay<Vec<Supplier>>,
    products_with_category: Replay<Catalog>,
    products_with_crud: Replay<Catalog>,
    selection: SelectionIndex,
    selected_product_suppliers: Replay<Vec<Supplier>>,
    intake: MutationIntake,
}

impl ProductService {
    /// Build the service with the default update rule.
    pub fn new(backend: Arc<dyn StorefrontBackend>, config: &CatalogConfig) -> Self {
        let (intake, queue) = MutationIntake::channel();
        Self::build(backend, config, intake, queue)
    }

    /// Build the service with a custom update rule.
    pub fn with_update_rule(
        backend: Arc<dyn StorefrontBackend>,
        config: &CatalogConfig,
        update_rule: UpdateRule,
    ) -> Self {
        let (intake, queue) = MutationIntake::with_update_rule(update_rule);
        Self::build(backend, config, intake, queue)
    }

    fn build(
        backend: Arc<dyn StorefrontBackend>,
        config: &CatalogConfig,
        intake: MutationIntake,
        queue: MutationQueue,
    ) -> Self {
        let products = {
            let backend = Arc::clone(&backend);
            remote(PRODUCT_COLLECTION, move || async move {
                backend
                    .list_products()
                    .await
                    .map_err(|e| CatalogError::fetch(PRODUCT_COLLECTION, &e))
            })
        };
        let product_categories = product_categories(&backend);
        let suppliers = suppliers(&backend);

        let products_with_category =
            enrich(&products, &product_categories, config.price_multiplier);
        let products_with_crud = materialize(
            &products_with_category,
            queue,
            Dispatcher::new(Arc::clone(&backend)),
        );

        let selection = SelectionIndex::new(&products_with_crud, config.initial_selection);
        let selected_product_suppliers = suppliers_for(selection.selected(), &suppliers);

        info!(
            price_multiplier = config.price_multiplier,
            initial_selection = ?config.initial_selection,
            "product service ready"
        );

        Self {
            products,
            product_categories,
            suppliers,
            products_with_category,
            products_with_crud,
            selection,
            selected_product_suppliers,
            intake,
        }
    }

    /// Raw products as returned by the backend.
    pub fn products(&self) -> &Replay<Vec<Product>> {
        &self.products
    }

    /// Cached product categories.
    pub fn product_categories(&self) -> &Replay<Vec<ProductCategory>> {
        &self.product_categories
    }

    /// Cached suppliers.
    pub fn suppliers(&self) -> &Replay<Vec<Supplier>> {
        &self.suppliers
    }

    /// Products joined with their categories.
    pub fn products_with_category(&self) -> &Replay<Catalog> {
        &self.products_with_category
    }

    /// The materialized catalog, including confirmed mutations.
    pub fn products_with_crud(&self) -> &Replay<Catalog> {
        &self.products_with_crud
    }

    /// The selected product id.
    pub fn selected_product_id(&self) -> &Replay<Option<ProductId>> {
        self.selection.selection()
    }

    /// The selected product, if it is in the catalog.
    pub fn selected_product(&self) -> &Replay<Option<Product>> {
        self.selection.selected()
    }

    /// Suppliers of the selected product.
    pub fn selected_product_suppliers(&self) -> &Replay<Vec<Supplier>> {
        &self.selected_product_suppliers
    }

    /// Change the selected product.
    pub fn selected_product_changed(&self, id: ProductId) {
        self.selection.select(id);
    }

    /// Queue an add; the placeholder product is used when `product` is `None`.
    pub fn add_new_product(&self, product: Option<&Product>) -> Result<(), CatalogError> {
        self.intake.request_add(product)
    }

    /// Queue an update.
    pub fn update_product(&self, product: &Product) -> Result<(), CatalogError> {
        self.intake.request_update(product)
    }

    /// Queue a delete.
    pub fn delete_product(&self, product: &Product) -> Result<(), CatalogError> {
        self.intake.request_delete(product)
    }
}

impl std::fmt::Debug for ProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService")
            .field("intake", &self.intake)
            .finish_non_exhaustive()
    }
}
