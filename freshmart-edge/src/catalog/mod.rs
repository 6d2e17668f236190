//! Catalog Repository - product reads and stock bookkeeping
//!
//! Products live under the `products` key of the [`PersistentStore`]. Every
//! mutation is a read-modify-write under the store lock. Products are never
//! hard-deleted; removal flips `isActive`.

use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Product, ProductCreate, ProductUpdate, normalize_category};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::storage::PersistentStore;
use crate::storage::seed::sku_for;

/// Inventory summary for the owner dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_products: usize,
    pub active_products: usize,
    pub low_stock_products: usize,
    pub out_of_stock_products: usize,
    /// Σ stock × cost (products without a cost contribute 0)
    pub total_value: i64,
}

#[derive(Debug, Clone)]
pub struct CatalogRepository {
    store: Arc<PersistentStore>,
}

impl CatalogRepository {
    pub fn new(store: Arc<PersistentStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Product> {
        self.store.products()
    }

    pub fn by_id(&self, id: i64) -> Option<Product> {
        self.list().into_iter().find(|p| p.id == id)
    }

    /// Exact match on the normalized category
    pub fn by_category(&self, category: &str) -> Vec<Product> {
        let wanted = normalize_category(category);
        self.filter(|p| normalize_category(&p.category) == wanted)
    }

    /// Case-insensitive substring over name, category and tags
    pub fn search(&self, query: &str) -> Vec<Product> {
        self.filter(|p| p.matches_query(query))
    }

    pub fn low_stock(&self) -> Vec<Product> {
        self.filter(Product::is_low_stock)
    }

    pub fn out_of_stock(&self) -> Vec<Product> {
        self.filter(Product::is_out_of_stock)
    }

    /// In stock and active
    pub fn available(&self) -> Vec<Product> {
        self.filter(Product::is_available)
    }

    /// Distinct normalized categories, sorted
    pub fn categories(&self) -> Vec<String> {
        self.list()
            .iter()
            .map(|p| normalize_category(&p.category))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn can_order(&self, id: i64, quantity: u32) -> bool {
        self.by_id(id)
            .is_some_and(|p| p.is_active && p.stock >= quantity)
    }

    fn filter(&self, predicate: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.list().into_iter().filter(|p| predicate(p)).collect()
    }

    /// Decrease stock, clamped at zero, and persist.
    ///
    /// Returns the new stock, or `None` for an unknown product (logged, not an
    /// error).
    pub fn decrement_stock(&self, id: i64, quantity: u32) -> Option<u32> {
        let _guard = self.store.lock();
        let mut products = self.store.products();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            tracing::warn!(product_id = id, "Stock decrement for unknown product ignored");
            return None;
        };

        if product.stock < quantity {
            tracing::warn!(
                product_id = id,
                stock = product.stock,
                requested = quantity,
                "Insufficient stock, clamping to zero"
            );
        }
        product.stock = product.stock.saturating_sub(quantity);
        let new_stock = product.stock;
        self.store.set_products(&products);

        tracing::debug!(product_id = id, stock = new_stock, "Stock decremented");
        Some(new_stock)
    }

    /// Increase stock and persist
    pub fn restock(&self, id: i64, quantity: u32) -> AppResult<u32> {
        self.modify(id, |product| {
            product.stock = product.stock.saturating_add(quantity);
            Ok(())
        })
        .map(|p| p.stock)
    }

    /// Add a product; id is `max + 1`, SKU derives from the category
    pub fn add_product(&self, data: ProductCreate) -> AppResult<Product> {
        validate_name(&data.name)?;
        validate_price(data.price)?;
        let category = validate_category(&data.category)?;

        let _guard = self.store.lock();
        let mut products = self.store.products();
        let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let sequence = products.iter().filter(|p| p.category == category).count() + 1;

        let product = Product {
            id,
            name: data.name.trim().to_string(),
            sku: sku_for(&category, sequence),
            price: data.price,
            stock: data.stock,
            min_stock: data.min_stock.unwrap_or(0),
            unit: data.unit.unwrap_or_else(|| "piece".to_string()),
            supplier: data.supplier.unwrap_or_default(),
            tags: data.tags.unwrap_or_default().into_iter().collect(),
            is_active: true,
            image: data.image,
            cost: data.cost,
            category,
        };
        products.push(product.clone());
        self.store.set_products(&products);

        tracing::info!(product_id = id, name = %product.name, "Product added");
        Ok(product)
    }

    pub fn update_product(&self, id: i64, data: ProductUpdate) -> AppResult<Product> {
        if let Some(name) = &data.name {
            validate_name(name)?;
        }
        if let Some(price) = data.price {
            validate_price(price)?;
        }
        let category = data.category.as_deref().map(validate_category).transpose()?;

        let product = self.modify(id, |p| {
            if let Some(name) = data.name {
                p.name = name.trim().to_string();
            }
            if let Some(category) = category {
                p.category = category;
            }
            if let Some(price) = data.price {
                p.price = price;
            }
            if let Some(stock) = data.stock {
                p.stock = stock;
            }
            if let Some(min_stock) = data.min_stock {
                p.min_stock = min_stock;
            }
            if let Some(unit) = data.unit {
                p.unit = unit;
            }
            if let Some(supplier) = data.supplier {
                p.supplier = supplier;
            }
            if let Some(tags) = data.tags {
                p.tags = tags.into_iter().collect();
            }
            if let Some(image) = data.image {
                p.image = Some(image);
            }
            if let Some(cost) = data.cost {
                p.cost = Some(cost);
            }
            if let Some(is_active) = data.is_active {
                p.is_active = is_active;
            }
            Ok(())
        })?;

        tracing::info!(product_id = id, "Product updated");
        Ok(product)
    }

    /// Soft delete
    pub fn deactivate(&self, id: i64) -> AppResult<Product> {
        let product = self.modify(id, |p| {
            p.is_active = false;
            Ok(())
        })?;
        tracing::info!(product_id = id, "Product deactivated");
        Ok(product)
    }

    pub fn stats(&self) -> InventoryStats {
        let products = self.list();
        InventoryStats {
            total_products: products.len(),
            active_products: products.iter().filter(|p| p.is_active).count(),
            low_stock_products: products.iter().filter(|p| p.is_low_stock()).count(),
            out_of_stock_products: products.iter().filter(|p| p.is_out_of_stock()).count(),
            total_value: products
                .iter()
                .map(|p| i64::from(p.stock) * p.cost.unwrap_or(0))
                .sum(),
        }
    }

    fn modify(
        &self,
        id: i64,
        f: impl FnOnce(&mut Product) -> AppResult<()>,
    ) -> AppResult<Product> {
        let _guard = self.store.lock();
        let mut products = self.store.products();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| product_not_found(id))?;
        f(product)?;
        let updated = product.clone();
        self.store.set_products(&products);
        Ok(updated)
    }
}

fn product_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        .with_detail("productId", id)
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Product name is required").with_detail("field", "name"));
    }
    Ok(())
}

/// Normalized category, rejected when blank
fn validate_category(raw: &str) -> AppResult<String> {
    let category = normalize_category(raw);
    if category.is_empty() {
        return Err(AppError::validation("Category is required").with_detail("field", "category"));
    }
    Ok(category)
}

fn validate_price(price: i64) -> AppResult<()> {
    if price <= 0 {
        return Err(
            AppError::with_message(ErrorCode::ProductInvalidPrice, "Price must be positive")
                .with_detail("price", price),
        );
    }
    Ok(())
}
