//! Subcommand implementations.
//!
//! Each command drives [`ProductService`] the way a screen would: subscribe
//! to the stream it renders, issue at most one mutation and wait for the
//! catalog to reflect it.

use miette::{IntoDiagnostic, Result};
use storefront_catalog::{
    Catalog, Product, ProductId, ProductListView, ProductService, Subscription,
};
use tracing::info;

/// Wait for the next catalog emission, turning stream failures into
/// diagnostics.
async fn next_catalog(sub: &mut Subscription<Catalog>) -> Result<Catalog> {
    match sub.next().await {
        Some(Ok(catalog)) => Ok(catalog),
        Some(Err(e)) => Err(miette::miette!("{}", e)),
        None => Err(miette::miette!("catalog stream closed")),
    }
}

fn find(catalog: &Catalog, id: ProductId) -> Result<Product> {
    catalog
        .get(id)
        .cloned()
        .ok_or_else(|| miette::miette!("product {} not found", id))
}

fn print_row(product: &Product) {
    println!(
        "{:>5}  {:<28} {:<14} {:>9} {:>6}",
        product.id.map(|id| id.to_string()).unwrap_or_default(),
        product.product_name,
        product.category.as_deref().unwrap_or("-"),
        product
            .price
            .map(|p| format!("{p:.2}"))
            .unwrap_or_else(|| "-".to_string()),
        product
            .quantity_in_stock
            .map(|q| q.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
}

fn print_json(product: &Product) -> Result<()> {
    let rendered = serde_json::to_string_pretty(product).into_diagnostic()?;
    println!("{rendered}");
    Ok(())
}

pub async fn list(service: &ProductService, category: u64) -> Result<()> {
    let view = ProductListView::new(service);
    view.category_selected(category);

    let model = view
        .view_model()
        .first()
        .await
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(name) = model
        .categories
        .iter()
        .find(|c| c.id == category)
        .map(|c| c.name.as_str())
    {
        println!("Category: {name}");
    }
    println!(
        "{:>5}  {:<28} {:<14} {:>9} {:>6}",
        "ID", "NAME", "CATEGORY", "PRICE", "STOCK"
    );
    for product in &model.products {
        print_row(product);
    }
    println!("{} product(s)", model.products.len());
    Ok(())
}

pub async fn show(service: &ProductService, id: ProductId) -> Result<()> {
    service.selected_product_changed(id);

    let product = service
        .selected_product()
        .first()
        .await
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("product {} not found", id))?;
    print_json(&product)?;

    let suppliers = service
        .selected_product_suppliers()
        .first()
        .await
        .map_err(|e| miette::miette!("{}", e))?;
    if suppliers.is_empty() {
        println!("No suppliers");
    }
    for supplier in suppliers {
        println!("Supplier {}: {}", supplier.id, supplier.name);
    }
    Ok(())
}

/// The product an add left in `after`.
///
/// A server that hands back an existing id gets that entry replaced in
/// place, so the created product is the one that differs from `before`
/// rather than the one with a new id.
fn created_product(before: &Catalog, after: &Catalog) -> Option<Product> {
    after
        .iter()
        .find(|p| !before.iter().any(|b| b == *p))
        .or_else(|| after.last())
        .cloned()
}

pub async fn add(service: &ProductService, json: Option<&str>) -> Result<()> {
    let product: Option<Product> = json
        .map(serde_json::from_str)
        .transpose()
        .into_diagnostic()?;

    let mut sub = service.products_with_crud().subscribe();
    let before = next_catalog(&mut sub).await?;

    service
        .add_new_product(product.as_ref())
        .map_err(|e| miette::miette!("{}", e))?;

    let after = next_catalog(&mut sub).await?;
    let created = created_product(&before, &after)
        .ok_or_else(|| miette::miette!("created product missing from catalog"))?;

    info!(id = ?created.id, "product added");
    print_json(&created)
}

pub async fn update(service: &ProductService, id: ProductId) -> Result<()> {
    let mut sub = service.products_with_crud().subscribe();
    let product = find(&next_catalog(&mut sub).await?, id)?;

    service
        .update_product(&product)
        .map_err(|e| miette::miette!("{}", e))?;

    let updated = find(&next_catalog(&mut sub).await?, id)?;
    println!(
        "Updated {}: stock {} -> {}",
        updated.product_name,
        product.quantity_in_stock.unwrap_or(0),
        updated.quantity_in_stock.unwrap_or(0)
    );
    Ok(())
}

pub async fn delete(service: &ProductService, id: ProductId) -> Result<()> {
    let mut sub = service.products_with_crud().subscribe();
    let product = find(&next_catalog(&mut sub).await?, id)?;

    service
        .delete_product(&product)
        .map_err(|e| miette::miette!("{}", e))?;

    let remaining = next_catalog(&mut sub).await?;
    println!(
        "Deleted {} ({} product(s) left)",
        product.product_name,
        remaining.len()
    );
    Ok(())
}
