//! Order views for the delivery app and the owner dashboard

use shared::models::{Order, OrderStatus};

/// Owner dashboard status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

/// Pending or confirmed, not yet assigned
pub fn available_for_delivery(orders: &[Order]) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| o.status.is_assignable() && o.assigned_to_id.is_none())
        .cloned()
        .collect()
}

/// Out for delivery with this agent
pub fn assigned_to_agent(orders: &[Order], agent_id: i64) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| o.is_active_for(agent_id))
        .cloned()
        .collect()
}

/// Delivered by this agent
pub fn completed_by_agent(orders: &[Order], agent_id: i64) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| o.status == OrderStatus::Delivered && o.assigned_to_id == Some(agent_id))
        .cloned()
        .collect()
}

/// Filtered, newest first
pub fn owner_view(orders: &[Order], filter: StatusFilter) -> Vec<Order> {
    let mut view: Vec<Order> = orders
        .iter()
        .filter(|o| filter.matches(o.status))
        .cloned()
        .collect();
    view.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use shared::models::DeliveryTime;

    fn order(id: &str, status: OrderStatus, agent: Option<i64>, minutes_ago: i64) -> Order {
        Order {
            order_id: id.to_string(),
            customer_name: "Asha".to_string(),
            customer_phone: "9999999999".to_string(),
            delivery_address: "12 Market Road".to_string(),
            delivery_time: DeliveryTime::Asap,
            items: Vec::new(),
            total: 100,
            status,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            confirmed_at: None,
            assigned_to: None,
            assigned_to_id: agent,
            assigned_at: None,
            delivered_at: None,
            delivery_notes: None,
            delivery_photo: None,
        }
    }

    fn sample() -> Vec<Order> {
        vec![
            order("A", OrderStatus::Pending, None, 30),
            order("B", OrderStatus::Confirmed, None, 10),
            order("C", OrderStatus::OutForDelivery, Some(1), 20),
            order("D", OrderStatus::Delivered, Some(1), 40),
            order("E", OrderStatus::Delivered, Some(2), 5),
        ]
    }

    fn ids(orders: &[Order]) -> Vec<&str> {
        orders.iter().map(|o| o.order_id.as_str()).collect()
    }

    #[test]
    fn test_available_for_delivery() {
        assert_eq!(ids(&available_for_delivery(&sample())), ["A", "B"]);
    }

    #[test]
    fn test_agent_views() {
        let orders = sample();
        assert_eq!(ids(&assigned_to_agent(&orders, 1)), ["C"]);
        assert_eq!(ids(&completed_by_agent(&orders, 1)), ["D"]);
        assert!(assigned_to_agent(&orders, 2).is_empty());
    }

    #[test]
    fn test_owner_view_sorted_newest_first() {
        let orders = sample();
        assert_eq!(ids(&owner_view(&orders, StatusFilter::All)), ["E", "B", "C", "A", "D"]);
        assert_eq!(
            ids(&owner_view(&orders, StatusFilter::Only(OrderStatus::Delivered))),
            ["E", "D"]
        );
    }
}
