//! View-models built on top of [`ProductService`].

use storefront_api::{CategoryId, Product, ProductCategory, ProductId};
use tracing::debug;

use crate::{Catalog, ProductService, Publisher, Replay, Signal, combine_latest};

/// Category filter value that keeps every product.
pub const ALL_CATEGORIES: CategoryId = 0;

/// Products in `category`, or all of them for [`ALL_CATEGORIES`].
pub fn filter_by_category(catalog: &Catalog, category: CategoryId) -> Vec<Product> {
    if category == ALL_CATEGORIES {
        return catalog.to_vec();
    }
    catalog
        .iter()
        .filter(|p| p.category_id == Some(category))
        .cloned()
        .collect()
}

/// What a product list screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListViewModel {
    pub products: Vec<Product>,
    pub categories: Vec<ProductCategory>,
}

/// Category-filtered product list.
pub struct ProductListView {
    category_tx: Publisher<CategoryId>,
    category: Replay<CategoryId>,
    products: Replay<Vec<Product>>,
    view_model: Replay<ProductListViewModel>,
}

impl ProductListView {
    /// Build the list view, initially showing every category.
    pub fn new(service: &ProductService) -> Self {
        let (category, category_tx) = Replay::channel(Signal::Value(ALL_CATEGORIES));

        let products = combine_latest(
            service.products_with_crud(),
            &category,
            |catalog, category| Ok(filter_by_category(catalog, *category)),
        );
        let view_model = combine_latest(
            &products,
            service.product_categories(),
            |products, categories| {
                Ok(ProductListViewModel {
                    products: products.clone(),
                    categories: categories.clone(),
                })
            },
        );

        Self {
            category_tx,
            category,
            products,
            view_model,
        }
    }

    /// Filter by category; [`ALL_CATEGORIES`] clears the filter.
    pub fn category_selected(&self, category: CategoryId) {
        debug!(category, "category selected");
        self.category_tx.publish(category);
    }

    pub fn category(&self) -> &Replay<CategoryId> {
        &self.category
    }

    pub fn products(&self) -> &Replay<Vec<Product>> {
        &self.products
    }

    pub fn view_model(&self) -> &Replay<ProductListViewModel> {
        &self.view_model
    }
}

/// What a product selection list renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSelectionViewModel {
    pub products: Catalog,
    /// Id of the selected product, `0` when nothing is selected.
    pub product_id: ProductId,
}

/// Enriched products paired with the current selection.
pub fn selection_view(service: &ProductService) -> Replay<ProductSelectionViewModel> {
    combine_latest(
        service.products_with_category(),
        service.selected_product(),
        |products, selected| {
            Ok(ProductSelectionViewModel {
                products: products.clone(),
                product_id: selected.as_ref().and_then(|p| p.id).unwrap_or(0),
            })
        },
    )
}
