//! Orders - 订单台账、视图与统计
//!
//! - [`OrderLedger`] - lifecycle transitions
//! - [`views`] - filtered order lists per role
//! - [`stats`] - dashboard counters

pub mod ledger;
pub mod stats;
pub mod views;

pub use ledger::{LedgerError, LedgerResult, OrderLedger};
pub use stats::{AgentStats, DashboardStats};
pub use views::StatusFilter;
