//! Selection index over the materialized catalog.

use storefront_api::{Product, ProductId};
use tracing::debug;

use crate::{Catalog, Publisher, Replay, Signal, combine_latest};

/// Product selected before the user picks one.
pub const DEFAULT_SELECTION: ProductId = 1;

/// Look up the selected product. Unknown ids and no selection give `None`.
pub fn find_selected(catalog: &Catalog, selection: Option<ProductId>) -> Option<Product> {
    selection.and_then(|id| catalog.get(id).cloned())
}

/// Tracks the selected product id and derives the selected product.
pub struct SelectionIndex {
    publisher: Publisher<Option<ProductId>>,
    selection: Replay<Option<ProductId>>,
    selected: Replay<Option<Product>>,
}

impl SelectionIndex {
    /// Build an index over `catalog`, starting at `initial`.
    pub fn new(catalog: &Replay<Catalog>, initial: Option<ProductId>) -> Self {
        let (selection, publisher) = Replay::channel(Signal::Value(initial));
        let selected = combine_latest(catalog, &selection, |catalog, selection| {
            Ok(find_selected(catalog, *selection))
        });

        Self {
            publisher,
            selection,
            selected,
        }
    }

    /// Select a product by id.
    pub fn select(&self, id: ProductId) {
        debug!(id, "product selected");
        self.publisher.publish(Some(id));
    }

    /// Clear the selection.
    pub fn clear(&self) {
        self.publisher.publish(None);
    }

    /// The selected id.
    pub fn selection(&self) -> &Replay<Option<ProductId>> {
        &self.selection
    }

    /// The selected product, re-derived whenever the catalog or the
    /// selection changes.
    pub fn selected(&self) -> &Replay<Option<Product>> {
        &self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Product {
                id: Some(1),
                product_name: "Leaf Rake".to_string(),
                ..Default::default()
            },
            Product {
                id: Some(2),
                product_name: "Garden Cart".to_string(),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_find_selected() {
        assert_eq!(
            find_selected(&catalog(), Some(2)).map(|p| p.product_name),
            Some("Garden Cart".to_string())
        );
        assert_eq!(find_selected(&catalog(), Some(999)), None);
        assert_eq!(find_selected(&catalog(), None), None);
    }

    #[tokio::test]
    async fn test_selection_follows_select_and_catalog() {
        let (cells, catalog_tx) = Replay::channel(Signal::Value(catalog()));
        let index = SelectionIndex::new(&cells, Some(DEFAULT_SELECTION));

        let mut selected = index.selected().subscribe();
        assert_eq!(selected.next().await.unwrap().unwrap().unwrap().id, Some(1));

        index.select(2);
        assert_eq!(selected.next().await.unwrap().unwrap().unwrap().id, Some(2));

        // Removing the selected product clears the derived selection
        catalog_tx.publish(Catalog::new(catalog()[..1].to_vec()));
        assert_eq!(selected.next().await, Some(Ok(None)));
    }

    #[tokio::test]
    async fn test_absent_selection_is_none() {
        let (cells, _catalog_tx) = Replay::channel(Signal::Value(catalog()));
        let index = SelectionIndex::new(&cells, None);

        index.select(999);
        assert_eq!(index.selection().latest(), Some(Some(999)));

        let mut selected = index.selected().subscribe();
        assert_eq!(selected.next().await, Some(Ok(None)));
    }
}
