//! Product Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Product entity
///
/// `price` and `cost` are minor currency units. Stock flags are derived from
/// `stock`/`min_stock` on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Normalized category token (see [`normalize_category`])
    pub category: String,
    pub price: i64,
    #[serde(default)]
    pub stock: u32,
    /// Reorder threshold
    #[serde(default)]
    pub min_stock: u32,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Display glyph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit cost, used for inventory valuation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Stock level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    InStock,
}

impl Product {
    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    /// 0 < stock <= min_stock
    pub fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock <= self.min_stock
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.is_out_of_stock() {
            StockStatus::OutOfStock
        } else if self.is_low_stock() {
            StockStatus::Low
        } else {
            StockStatus::InStock
        }
    }

    /// In stock and not soft-deleted
    pub fn is_available(&self) -> bool {
        self.stock > 0 && self.is_active
    }

    /// Case-insensitive substring match over name, category and tags
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self.category.to_lowercase().contains(&q)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&q))
    }
}

/// Normalize a category label: lower-case, all whitespace removed.
///
/// `"Frozen Foods"` → `"frozenfoods"`
pub fn normalize_category(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub category: String,
    pub price: i64,
    pub stock: u32,
    pub min_stock: Option<u32>,
    pub unit: Option<String>,
    pub supplier: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
    pub cost: Option<i64>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<u32>,
    pub min_stock: Option<u32>,
    pub unit: Option<String>,
    pub supplier: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
    pub cost: Option<i64>,
    pub is_active: Option<bool>,
}
