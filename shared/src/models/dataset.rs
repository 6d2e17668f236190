//! Dataset and remote record
//!
//! The four logical keys that make up the persisted dataset, and the document
//! shape mirrored to the remote bin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DeliveryAgent, Order, Product};

/// Logical storage key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Orders,
    DeliveryBoys,
    Products,
    CurrentDeliveryBoy,
}

impl StoreKey {
    pub const ALL: [StoreKey; 4] = [
        StoreKey::Orders,
        StoreKey::DeliveryBoys,
        StoreKey::Products,
        StoreKey::CurrentDeliveryBoy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::Orders => "orders",
            StoreKey::DeliveryBoys => "deliveryBoys",
            StoreKey::Products => "products",
            StoreKey::CurrentDeliveryBoy => "currentDeliveryBoy",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The whole logical dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub delivery_boys: Vec<DeliveryAgent>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub current_delivery_boy: Option<DeliveryAgent>,
}

/// Document stored in the remote bin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    #[serde(flatten)]
    pub data: Dataset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl RemoteRecord {
    /// Record for a regular push
    pub fn for_push(data: Dataset, now: DateTime<Utc>) -> Self {
        Self {
            data,
            last_sync: Some(now),
            created_at: None,
        }
    }

    /// Record for initial bin creation
    pub fn for_create(data: Dataset, now: DateTime<Utc>) -> Self {
        Self {
            data,
            last_sync: None,
            created_at: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_strings() {
        let keys: Vec<_> = StoreKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["orders", "deliveryBoys", "products", "currentDeliveryBoy"]);
    }

    #[test]
    fn test_remote_record_is_flat() {
        let record = RemoteRecord::for_push(Dataset::default(), Utc::now());
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("orders").is_some());
        assert!(value.get("deliveryBoys").is_some());
        assert!(value.get("lastSync").is_some());
        assert!(value.get("createdAt").is_none());
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_remote_record_tolerates_missing_keys() {
        let record: RemoteRecord = serde_json::from_str(r#"{"orders":[]}"#).unwrap();
        assert!(record.data.products.is_empty());
        assert!(record.data.current_delivery_boy.is_none());
        assert!(record.last_sync.is_none());
    }
}
