//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;

/// Order lifecycle status
///
/// ```text
/// pending ──► confirmed ──► out-for-delivery ──► delivered
///    └──────── quick assign ──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// Position in the lifecycle; strictly increases on every transition
    pub fn rank(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Confirmed => 1,
            OrderStatus::OutForDelivery => 2,
            OrderStatus::Delivered => 3,
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Pending, OrderStatus::OutForDelivery)
                | (OrderStatus::Confirmed, OrderStatus::OutForDelivery)
                | (OrderStatus::OutForDelivery, OrderStatus::Delivered)
        )
    }

    /// Awaiting dispatch (pending or confirmed)
    pub fn is_assignable(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Delivered
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 期望送达时间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeliveryTime {
    #[default]
    #[serde(rename = "asap")]
    Asap,
    #[serde(rename = "1hour")]
    OneHour,
    #[serde(rename = "2hours")]
    TwoHours,
    #[serde(rename = "evening")]
    Evening,
}

impl DeliveryTime {
    pub fn label(self) -> &'static str {
        match self {
            DeliveryTime::Asap => "ASAP (30-45 mins)",
            DeliveryTime::OneHour => "Within 1 Hour",
            DeliveryTime::TwoHours => "Within 2 Hours",
            DeliveryTime::Evening => "Evening (6-8 PM)",
        }
    }

    /// Estimate shown on the order confirmation
    pub fn estimate(self) -> &'static str {
        match self {
            DeliveryTime::Asap => "30-45 minutes",
            DeliveryTime::OneHour => "1 hour",
            DeliveryTime::TwoHours => "2 hours",
            DeliveryTime::Evening => "6-8 PM today",
        }
    }
}

/// Cart line captured in the storefront
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id
    pub id: i64,
    pub name: String,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// Snapshot a catalog product into a cart line
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }
}

/// Order line (value snapshot, not a live product reference)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product id
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
}

impl OrderItem {
    /// `None` on overflow
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(i64::from(self.quantity))
    }
}

impl From<CartItem> for OrderItem {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Checkout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: String,
    #[serde(default)]
    pub delivery_time: DeliveryTime,
    pub items: Vec<CartItem>,
}

/// Order entity
///
/// Every optional timestamp/assignment field is set exactly once by its
/// transition and never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: String,
    #[serde(default)]
    pub delivery_time: DeliveryTime,
    pub items: Vec<OrderItem>,
    /// Σ price × quantity at creation, never recomputed
    pub total: i64,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Agent name at assignment time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_photo: Option<String>,
}

impl Order {
    /// Sum of line totals; `None` if any step overflows
    pub fn compute_total(items: &[OrderItem]) -> Option<i64> {
        items
            .iter()
            .try_fold(0i64, |acc, item| acc.checked_add(item.line_total()?))
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Currently out for delivery with the given agent
    pub fn is_active_for(&self, agent_id: i64) -> bool {
        self.status == OrderStatus::OutForDelivery && self.assigned_to_id == Some(agent_id)
    }
}
