//! Agent Directory - 配送员目录
//!
//! Busy/available is never trusted from storage: every read derives it from
//! the current orders with [`derive_statuses`]. The stored field is only a
//! snapshot, refreshed by [`AgentDirectory::recompute_status`], so the synced
//! dataset stays readable by other front ends.

pub mod auth;
pub mod session;

pub use auth::{Authenticator, SharedSecretAuthenticator};
pub use session::{AgentSession, SessionError};

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{AgentStatus, DeliveryAgent, Order, OrderStatus};
use std::collections::HashSet;
use std::sync::Arc;

use crate::storage::PersistentStore;

/// Reset every agent to available, then mark busy each agent referenced by an
/// out-for-delivery order.
///
/// Pure and idempotent. References to unknown agents are ignored.
pub fn derive_statuses(agents: &[DeliveryAgent], orders: &[Order]) -> Vec<DeliveryAgent> {
    let busy: HashSet<i64> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::OutForDelivery)
        .filter_map(|o| o.assigned_to_id)
        .collect();

    agents
        .iter()
        .map(|agent| {
            let mut agent = agent.clone();
            agent.status = if busy.contains(&agent.id) {
                AgentStatus::Busy
            } else {
                AgentStatus::Available
            };
            agent
        })
        .collect()
}

/// Highest-rated derived-available agent; ties go to the earliest in
/// directory order.
pub fn pick_best(agents: &[DeliveryAgent], orders: &[Order]) -> Option<DeliveryAgent> {
    derive_statuses(agents, orders)
        .into_iter()
        .filter(DeliveryAgent::is_available)
        .fold(None, |best: Option<DeliveryAgent>, agent| match best {
            Some(current) if current.rating >= agent.rating => Some(current),
            _ => Some(agent),
        })
}

#[derive(Debug, Clone)]
pub struct AgentDirectory {
    store: Arc<PersistentStore>,
}

impl AgentDirectory {
    pub fn new(store: Arc<PersistentStore>) -> Self {
        Self { store }
    }

    /// Agents with status derived from the current orders
    pub fn list(&self) -> Vec<DeliveryAgent> {
        derive_statuses(&self.store.agents(), &self.store.orders())
    }

    /// Agents exactly as stored
    pub fn list_stored(&self) -> Vec<DeliveryAgent> {
        self.store.agents()
    }

    pub fn by_id(&self, id: i64) -> Option<DeliveryAgent> {
        self.list().into_iter().find(|a| a.id == id)
    }

    pub fn set_online(&self, id: i64, online: bool) -> AppResult<DeliveryAgent> {
        let agent = self.modify(id, |a| a.online = online)?;
        tracing::info!(agent_id = id, online, "Agent presence changed");
        Ok(agent)
    }

    /// Overwrite the stored status snapshot. Reads keep deriving from orders.
    pub fn set_status(&self, id: i64, status: AgentStatus) -> AppResult<DeliveryAgent> {
        self.modify(id, |a| a.status = status)
    }

    pub fn increment_delivered(&self, id: i64) -> AppResult<DeliveryAgent> {
        self.modify(id, |a| a.orders_delivered = a.orders_delivered.saturating_add(1))
    }

    /// Derive statuses from `orders` and store the snapshot
    pub fn recompute_status(&self, orders: &[Order]) -> Vec<DeliveryAgent> {
        let _guard = self.store.lock();
        let agents = derive_statuses(&self.store.agents(), orders);
        self.store.set_agents(&agents);
        agents
    }

    /// See [`pick_best`]
    pub fn best_available(&self, orders: &[Order]) -> Option<DeliveryAgent> {
        pick_best(&self.store.agents(), orders)
    }

    /// Number of derived-available agents
    pub fn available_count(&self, orders: &[Order]) -> usize {
        derive_statuses(&self.store.agents(), orders)
            .iter()
            .filter(|a| a.is_available())
            .count()
    }

    fn modify(&self, id: i64, f: impl FnOnce(&mut DeliveryAgent)) -> AppResult<DeliveryAgent> {
        let _guard = self.store.lock();
        let mut agents = self.store.agents();
        let agent = agents
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| agent_not_found(id))?;
        f(agent);
        let updated = agent.clone();
        self.store.set_agents(&agents);

        // 当前登录的配送员保持同步
        if self.store.current_agent().is_some_and(|current| current.id == id) {
            self.store.set_current_agent(Some(&updated));
        }
        Ok(updated)
    }
}

pub(crate) fn agent_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::AgentNotFound, format!("Delivery agent {id} not found"))
        .with_detail("agentId", id)
}
