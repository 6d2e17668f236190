//! 核心模块 - 配置、节点状态和后台任务
//!
//! - [`Config`] - 节点配置
//! - [`AppState`] - 组件装配
//! - [`BackgroundTasks`] - 后台任务管理

pub mod config;
pub mod state;
pub mod tasks;

pub use config::{Config, RemoteConfig};
pub use state::AppState;
pub use tasks::BackgroundTasks;
