//! OrderLedger - 订单状态机
//!
//! ```text
//! create(draft)           ──► pending
//! confirm(id)             pending ──► confirmed
//! assign(id, agent)       pending | confirmed ──► out-for-delivery
//! quick_assign(id)        pending | confirmed ──► out-for-delivery (best agent)
//! deliver(id, notes, ..)  out-for-delivery ──► delivered
//! ```
//!
//! Every operation is one read-modify-write of the `orders` key under the
//! store lock. Agent status is recomputed after each assignment change.

mod error;
pub use error::LedgerError;

use chrono::Utc;
use shared::models::{DeliveryAgent, Order, OrderDraft, OrderItem, OrderStatus};
use shared::util::generate_order_id;
use std::sync::Arc;

use super::views::{self, StatusFilter};
use crate::agents::AgentDirectory;
use crate::catalog::CatalogRepository;
use crate::storage::PersistentStore;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Clone)]
pub struct OrderLedger {
    store: Arc<PersistentStore>,
    catalog: CatalogRepository,
    agents: AgentDirectory,
}

impl OrderLedger {
    pub fn new(
        store: Arc<PersistentStore>,
        catalog: CatalogRepository,
        agents: AgentDirectory,
    ) -> Self {
        Self {
            store,
            catalog,
            agents,
        }
    }

    pub fn list(&self) -> Vec<Order> {
        self.store.orders()
    }

    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.list().into_iter().find(|o| o.order_id == order_id)
    }

    // ========== Views ==========

    pub fn available_for_delivery(&self) -> Vec<Order> {
        views::available_for_delivery(&self.list())
    }

    pub fn assigned_to_agent(&self, agent_id: i64) -> Vec<Order> {
        views::assigned_to_agent(&self.list(), agent_id)
    }

    pub fn completed_by_agent(&self, agent_id: i64) -> Vec<Order> {
        views::completed_by_agent(&self.list(), agent_id)
    }

    pub fn owner_view(&self, filter: StatusFilter) -> Vec<Order> {
        views::owner_view(&self.list(), filter)
    }

    // ========== Transitions ==========

    /// Place an order with a freshly generated id
    pub fn create(&self, draft: OrderDraft) -> LedgerResult<Order> {
        self.create_with_id(generate_order_id(), draft)
    }

    /// Place an order with a caller-supplied id.
    ///
    /// Lines with quantity 0 are dropped. Stock is decremented per line;
    /// unknown products or short stock are logged and never block the order.
    pub fn create_with_id(&self, order_id: String, draft: OrderDraft) -> LedgerResult<Order> {
        let items: Vec<OrderItem> = draft
            .items
            .into_iter()
            .filter(|item| item.quantity > 0)
            .map(OrderItem::from)
            .collect();
        if items.is_empty() {
            return Err(LedgerError::OrderEmpty);
        }
        if items.iter().any(|item| item.price <= 0) {
            return Err(LedgerError::Validation { field: "price" });
        }
        for (field, value) in [
            ("customerName", &draft.customer_name),
            ("customerPhone", &draft.customer_phone),
            ("deliveryAddress", &draft.delivery_address),
        ] {
            if value.trim().is_empty() {
                return Err(LedgerError::Validation { field });
            }
        }

        let total =
            Order::compute_total(&items).ok_or(LedgerError::Validation { field: "total" })?;

        let _guard = self.store.lock();
        let mut orders = self.store.orders();
        if orders.iter().any(|o| o.order_id == order_id) {
            return Err(LedgerError::DuplicateOrder(order_id));
        }

        let order = Order {
            total,
            order_id,
            customer_name: draft.customer_name.trim().to_string(),
            customer_phone: draft.customer_phone.trim().to_string(),
            delivery_address: draft.delivery_address.trim().to_string(),
            delivery_time: draft.delivery_time,
            items,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            confirmed_at: None,
            assigned_to: None,
            assigned_to_id: None,
            assigned_at: None,
            delivered_at: None,
            delivery_notes: None,
            delivery_photo: None,
        };

        for item in &order.items {
            self.catalog.decrement_stock(item.id, item.quantity);
        }

        orders.push(order.clone());
        self.store.set_orders(&orders);

        tracing::info!(
            order_id = %order.order_id,
            total = order.total,
            items = order.items.len(),
            "Order created"
        );
        Ok(order)
    }

    pub fn confirm(&self, order_id: &str) -> LedgerResult<Order> {
        self.transition(order_id, OrderStatus::Confirmed, |order| {
            order.confirmed_at = Some(Utc::now());
            Ok(())
        })
    }

    /// Hand the order to a specific agent
    pub fn assign(&self, order_id: &str, agent_id: i64) -> LedgerResult<Order> {
        let _guard = self.store.lock();
        let agent = self
            .agents
            .by_id(agent_id)
            .ok_or(LedgerError::AgentNotFound(agent_id));
        self.assign_to(order_id, agent)
    }

    /// Hand the order to the best available agent
    pub fn quick_assign(&self, order_id: &str) -> LedgerResult<Order> {
        let _guard = self.store.lock();
        let orders = self.store.orders();
        let agent = self
            .agents
            .best_available(&orders)
            .ok_or(LedgerError::NoAgentsAvailable);
        self.assign_to(order_id, agent)
    }

    fn assign_to(
        &self,
        order_id: &str,
        agent: LedgerResult<DeliveryAgent>,
    ) -> LedgerResult<Order> {
        let order = self.transition(order_id, OrderStatus::OutForDelivery, |order| {
            // 订单状态错误优先于配送员错误
            let agent = agent?;
            order.assigned_to = Some(agent.name);
            order.assigned_to_id = Some(agent.id);
            order.assigned_at = Some(Utc::now());
            Ok(())
        })?;

        tracing::info!(
            order_id = %order.order_id,
            agent_id = ?order.assigned_to_id,
            "Order assigned"
        );
        Ok(order)
    }

    /// Confirm delivery; the agent's delivered count goes up by one
    pub fn deliver(
        &self,
        order_id: &str,
        notes: Option<String>,
        photo: Option<String>,
    ) -> LedgerResult<Order> {
        let _guard = self.store.lock();
        let order = self.transition(order_id, OrderStatus::Delivered, |order| {
            order.delivered_at = Some(Utc::now());
            order.delivery_notes = notes.filter(|n| !n.trim().is_empty());
            order.delivery_photo = photo;
            Ok(())
        })?;

        if let Some(agent_id) = order.assigned_to_id
            && let Err(e) = self.agents.increment_delivered(agent_id)
        {
            tracing::warn!(order_id = %order.order_id, agent_id, error = %e, "Delivering agent no longer exists");
        }
        self.agents.recompute_status(&self.store.orders());

        tracing::info!(order_id = %order.order_id, "Order delivered");
        Ok(order)
    }

    /// Validate `from -> to`, apply `f`, persist, and recompute agent status
    /// when the assignment picture changed.
    fn transition(
        &self,
        order_id: &str,
        to: OrderStatus,
        f: impl FnOnce(&mut Order) -> LedgerResult<()>,
    ) -> LedgerResult<Order> {
        let _guard = self.store.lock();
        let mut orders = self.store.orders();
        let index = orders
            .iter()
            .position(|o| o.order_id == order_id)
            .ok_or_else(|| LedgerError::OrderNotFound(order_id.to_string()))?;

        let from = orders[index].status;
        if !from.can_transition_to(to) {
            tracing::debug!(order_id, %from, %to, "Transition rejected");
            return Err(if from.is_terminal() {
                LedgerError::AlreadyDelivered(order_id.to_string())
            } else {
                LedgerError::InvalidTransition {
                    order_id: order_id.to_string(),
                    from,
                    to,
                }
            });
        }

        let mut order = orders[index].clone();
        f(&mut order)?;
        order.status = to;
        orders[index] = order.clone();
        self.store.set_orders(&orders);

        if to == OrderStatus::OutForDelivery {
            self.agents.recompute_status(&orders);
        }

        tracing::info!(order_id, %from, %to, "Order status changed");
        Ok(order)
    }
}

#[cfg(test)]
mod tests;
