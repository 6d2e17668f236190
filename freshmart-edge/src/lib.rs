//! FreshMart Edge - 生鲜杂货下单节点
//!
//! # 架构概述
//!
//! 单节点保存完整数据集 (订单、配送员、商品)，可选地镜像到 JSONBin：
//!
//! - **存储** (`storage`): durable (redb) → session → memory 三级回退
//! - **商品** (`catalog`): 商品目录与库存
//! - **配送员** (`agents`): 目录、派生状态、登录会话
//! - **订单** (`orders`): 订单状态机、视图、统计
//! - **同步** (`cloud_sync`): 整体推送/拉取，后台自动同步
//!
//! # 模块结构
//!
//! ```text
//! freshmart-edge/src/
//! ├── core/          # 配置、状态、后台任务
//! ├── storage/       # PersistentStore 与默认数据
//! ├── catalog/       # CatalogRepository
//! ├── agents/        # AgentDirectory, AgentSession
//! ├── orders/        # OrderLedger, 视图, 统计
//! ├── cloud_sync/    # SyncCoordinator, JsonBinClient, SyncWorker
//! └── utils/         # 日志
//! ```

pub mod agents;
pub mod catalog;
pub mod cloud_sync;
pub mod core;
pub mod orders;
pub mod storage;
pub mod utils;

// Re-export 公共类型
pub use agents::{AgentDirectory, AgentSession};
pub use catalog::CatalogRepository;
pub use cloud_sync::{SyncCoordinator, SyncOutcome, SyncStatus};
pub use crate::core::{AppState, BackgroundTasks, Config};
pub use orders::{LedgerError, OrderLedger};
pub use storage::PersistentStore;
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env，初始化日志，返回配置
pub fn setup_environment() -> anyhow::Result<Config> {
    // .env 是可选的
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(config.work_dir())?;
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.is_production()),
        config.log_dir.as_deref(),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ______               __    __  ___           __
   / ____/_______  _____/ /_  /  |/  /___ ______/ /_
  / /_  / ___/ _ \/ ___/ __ \/ /|_/ / __ `/ ___/ __/
 / __/ / /  /  __(__  ) / / / /  / / /_/ / /  / /_
/_/   /_/   \___/____/_/ /_/_/  /_/\__,_/_/   \__/
    "#
    );
}
