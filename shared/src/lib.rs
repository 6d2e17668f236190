//! Shared types for FreshMart
//!
//! Domain models, the unified error system and small time/id utilities used
//! by the edge node and its tests. No I/O lives here.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
