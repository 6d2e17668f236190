//! Dashboard statistics
//!
//! "Today" is the local calendar day of the machine running the node.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::{DeliveryAgent, Order, OrderStatus};
use shared::util::is_same_local_day;

use crate::agents::derive_statuses;

/// Flat earning credited per completed delivery
pub const EARNING_PER_DELIVERY: i64 = 20;

/// Owner dashboard counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: usize,
    pub total_revenue: i64,
    pub pending_orders: usize,
    pub available_agents: usize,
}

/// Delivery app counters for one agent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    pub orders_delivered: usize,
    pub earnings: i64,
    pub current_orders: usize,
    pub rating: f64,
}

pub fn dashboard(orders: &[Order], agents: &[DeliveryAgent], now: DateTime<Utc>) -> DashboardStats {
    let today: Vec<&Order> = orders
        .iter()
        .filter(|o| is_same_local_day(o.created_at, now))
        .collect();

    DashboardStats {
        total_orders: today.len(),
        total_revenue: today.iter().map(|o| o.total).sum(),
        pending_orders: today
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count(),
        available_agents: derive_statuses(agents, orders)
            .iter()
            .filter(|a| a.is_available())
            .count(),
    }
}

pub fn agent(orders: &[Order], agent: &DeliveryAgent, now: DateTime<Utc>) -> AgentStats {
    let delivered_today = orders
        .iter()
        .filter(|o| {
            o.status == OrderStatus::Delivered
                && o.assigned_to_id == Some(agent.id)
                && o.delivered_at.is_some_and(|at| is_same_local_day(at, now))
        })
        .count();

    AgentStats {
        orders_delivered: delivered_today,
        earnings: delivered_today as i64 * EARNING_PER_DELIVERY,
        current_orders: orders.iter().filter(|o| o.is_active_for(agent.id)).count(),
        rating: agent.rating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed::default_agents;
    use chrono::Duration;
    use shared::models::DeliveryTime;

    fn order(status: OrderStatus, total: i64, agent: Option<i64>, age: Duration) -> Order {
        let created_at = Utc::now() - age;
        Order {
            order_id: format!("ORD{}", total),
            customer_name: "Asha".to_string(),
            customer_phone: "9999999999".to_string(),
            delivery_address: "12 Market Road".to_string(),
            delivery_time: DeliveryTime::Asap,
            items: Vec::new(),
            total,
            status,
            created_at,
            confirmed_at: None,
            assigned_to: None,
            assigned_to_id: agent,
            assigned_at: None,
            delivered_at: (status == OrderStatus::Delivered).then_some(created_at),
            delivery_notes: None,
            delivery_photo: None,
        }
    }

    #[test]
    fn test_dashboard_counts_today_only() {
        let now = Utc::now();
        let orders = vec![
            order(OrderStatus::Pending, 100, None, Duration::zero()),
            order(OrderStatus::OutForDelivery, 250, Some(1), Duration::zero()),
            order(OrderStatus::Pending, 999, None, Duration::days(3)),
        ];
        let stats = dashboard(&orders, &default_agents(), now);
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_revenue, 350);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.available_agents, 4);
    }

    #[test]
    fn test_agent_stats() {
        let now = Utc::now();
        let agents = default_agents();
        let orders = vec![
            order(OrderStatus::Delivered, 1, Some(1), Duration::zero()),
            order(OrderStatus::Delivered, 2, Some(1), Duration::zero()),
            order(OrderStatus::Delivered, 3, Some(1), Duration::days(2)),
            order(OrderStatus::Delivered, 4, Some(2), Duration::zero()),
            order(OrderStatus::OutForDelivery, 5, Some(1), Duration::zero()),
        ];
        let stats = agent(&orders, &agents[0], now);
        assert_eq!(stats.orders_delivered, 2);
        assert_eq!(stats.earnings, 40);
        assert_eq!(stats.current_orders, 1);
        assert_eq!(stats.rating, 5.0);
    }
}
