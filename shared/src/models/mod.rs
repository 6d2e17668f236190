//! Data models
//!
//! Persisted JSON uses camelCase field names so the dataset stays compatible
//! with the browser front ends and the remote bin. All IDs are `i64`.

pub mod dataset;
pub mod delivery_agent;
pub mod order;
pub mod product;

// Re-exports
pub use dataset::*;
pub use delivery_agent::*;
pub use order::*;
pub use product::*;
