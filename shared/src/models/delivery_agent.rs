//! Delivery Agent Model

use serde::{Deserialize, Serialize};

/// 配送员状态（派生值，由订单重新计算，不以存储值为准）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Available,
    Busy,
}

/// Delivery agent entity
///
/// `password` is the legacy demo shared secret. It is not a security boundary
/// and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAgent {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub status: AgentStatus,
    /// Agent-toggled presence
    #[serde(default)]
    pub online: bool,
    /// Incremented only on delivery confirmation
    #[serde(default)]
    pub orders_delivered: u32,
    #[serde(default)]
    pub rating: f64,
}

impl DeliveryAgent {
    pub fn is_available(&self) -> bool {
        self.status == AgentStatus::Available
    }

    /// 姓名首字母（头像显示）
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

impl std::fmt::Debug for DeliveryAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryAgent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("password", &"***")
            .field("status", &self.status)
            .field("online", &self.online)
            .field("orders_delivered", &self.orders_delivered)
            .field("rating", &self.rating)
            .finish()
    }
}
