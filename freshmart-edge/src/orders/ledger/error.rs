use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

/// Ledger errors
///
/// A rejected operation leaves the order untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already exists: {0}")]
    DuplicateOrder(String),

    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Order already delivered: {0}")]
    AlreadyDelivered(String),

    #[error("Delivery agent not found: {0}")]
    AgentNotFound(i64),

    #[error("No delivery agents available")]
    NoAgentsAvailable,

    #[error("Order has no items")]
    OrderEmpty,

    #[error("{field} is missing or invalid")]
    Validation { field: &'static str },
}

impl LedgerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LedgerError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            LedgerError::DuplicateOrder(_) => ErrorCode::AlreadyExists,
            LedgerError::InvalidTransition { .. } => ErrorCode::OrderInvalidTransition,
            LedgerError::AlreadyDelivered(_) => ErrorCode::OrderAlreadyDelivered,
            LedgerError::AgentNotFound(_) => ErrorCode::AgentNotFound,
            LedgerError::NoAgentsAvailable => ErrorCode::NoAgentsAvailable,
            LedgerError::OrderEmpty => ErrorCode::OrderEmpty,
            LedgerError::Validation { .. } => ErrorCode::ValidationFailed,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let code = err.code();
        let message = err.to_string();
        let app = AppError::with_message(code, message);
        match err {
            LedgerError::OrderNotFound(id)
            | LedgerError::DuplicateOrder(id)
            | LedgerError::AlreadyDelivered(id) => app.with_detail("orderId", id),
            LedgerError::InvalidTransition { order_id, from, .. } => app
                .with_detail("orderId", order_id)
                .with_detail("status", from.as_str()),
            LedgerError::AgentNotFound(id) => app.with_detail("agentId", id),
            LedgerError::Validation { field } => app.with_detail("field", field),
            LedgerError::NoAgentsAvailable | LedgerError::OrderEmpty => app,
        }
    }
}
