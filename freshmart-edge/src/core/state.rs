use std::sync::Arc;

use shared::error::AppResult;

use crate::agents::{AgentDirectory, AgentSession, SharedSecretAuthenticator};
use crate::catalog::CatalogRepository;
use crate::cloud_sync::{JsonBinClient, RemoteMirror, SyncCoordinator, SyncWorker};
use crate::core::config::fetch_remote_config;
use crate::core::tasks::BackgroundTasks;
use crate::core::Config;
use crate::orders::OrderLedger;
use crate::storage::{PersistentStore, seed};

/// 节点状态 - 持有所有组件的共享引用
///
/// 所有组件共享同一个 [`PersistentStore`]，使用 Arc 实现浅拷贝。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<PersistentStore> | 三级存储 (durable → session → memory) |
/// | catalog | CatalogRepository | 商品与库存 |
/// | agents | AgentDirectory | 配送员目录 |
/// | sessions | Arc<AgentSession> | 配送员登录会话 |
/// | ledger | OrderLedger | 订单状态机 |
/// | sync | Arc<SyncCoordinator> | 远程镜像同步 |
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<PersistentStore>,
    pub catalog: CatalogRepository,
    pub agents: AgentDirectory,
    pub sessions: Arc<AgentSession>,
    pub ledger: OrderLedger,
    pub sync: Arc<SyncCoordinator>,
}

impl AppState {
    /// 使用已有的存储和镜像组装状态
    pub fn with_parts(
        config: Config,
        store: Arc<PersistentStore>,
        mirror: Arc<dyn RemoteMirror>,
    ) -> Self {
        let catalog = CatalogRepository::new(store.clone());
        let agents = AgentDirectory::new(store.clone());
        let sessions = Arc::new(AgentSession::new(
            store.clone(),
            agents.clone(),
            Arc::new(SharedSecretAuthenticator),
        ));
        let ledger = OrderLedger::new(store.clone(), catalog.clone(), agents.clone());
        let sync = Arc::new(SyncCoordinator::new(
            store.clone(),
            mirror,
            config.remote.clone(),
        ));

        Self {
            config,
            store,
            catalog,
            agents,
            sessions,
            ledger,
            sync,
        }
    }

    /// 初始化节点状态
    ///
    /// 1. 打开存储 (不可用的层级会被跳过)
    /// 2. 写入默认商品/配送员，清理演示订单
    /// 3. 如设置了 CONFIG_URL，拉取远程凭据并合并
    /// 4. 创建 JSONBin 客户端
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let mut config = config.clone();

        let store = Arc::new(PersistentStore::open(config.work_dir()));
        let status = store.status();
        if status.memory_only() {
            tracing::warn!("No persistent storage available, data will not survive a restart");
        }
        let purged = seed::initialize_defaults(&store);
        if purged > 0 {
            tracing::info!(purged, "Removed demo orders");
        }

        if let Some(url) = config.config_url.clone() {
            match fetch_remote_config(&url, config.request_timeout()).await {
                Ok(remote) => config.remote.merge(remote),
                Err(e) => tracing::warn!(error = %e, "Config endpoint unavailable, using env values"),
            }
        }

        let client = JsonBinClient::new(
            &config.jsonbin_base_url,
            &config.remote.api_key,
            config.request_timeout(),
        )?;

        tracing::info!(
            durable = status.durable,
            session = status.session,
            remote = config.remote.is_configured(),
            "Node state initialized"
        );
        Ok(Self::with_parts(config, store, Arc::new(client)))
    }

    /// Memory-only state with sync disabled
    pub fn in_memory() -> AppResult<Self> {
        let config = Config::with_work_dir("./data");
        let client = JsonBinClient::new(
            &config.jsonbin_base_url,
            &config.remote.api_key,
            config.request_timeout(),
        )?;
        Ok(Self::with_parts(
            config,
            Arc::new(PersistentStore::in_memory()),
            Arc::new(client),
        ))
    }

    /// 启动后台任务
    ///
    /// - 自动同步 (SyncWorker)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let worker = SyncWorker::new(
            self.sync.clone(),
            self.config.sync_interval(),
            tasks.shutdown_token(),
        );
        tasks.spawn("sync_worker", worker.run());
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CartItem, OrderDraft, OrderStatus};

    #[test]
    fn test_in_memory_shares_one_store() {
        let state = AppState::in_memory().unwrap();
        assert!(state.store.status().memory_only());
        assert!(!state.sync.is_configured());

        let milk = state.catalog.by_id(13).unwrap();
        let order = state
            .ledger
            .create(OrderDraft {
                customer_name: "Asha".into(),
                customer_phone: "9000000000".into(),
                delivery_address: "12 Lake Road".into(),
                delivery_time: Default::default(),
                items: vec![CartItem::from_product(&milk, 1)],
            })
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(state.store.orders().len(), 1);
    }

    #[tokio::test]
    async fn test_initialize_seeds_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_work_dir(dir.path().to_string_lossy());

        let state = AppState::initialize(&config).await.unwrap();
        assert!(state.store.status().durable);
        assert_eq!(state.catalog.list().len(), seed::default_products().len());
        assert_eq!(state.agents.list().len(), seed::default_agents().len());
        assert!(config.db_path().exists());
    }

    #[tokio::test]
    async fn test_background_tasks_stop_on_shutdown() {
        let state = AppState::in_memory().unwrap();
        let tasks = state.start_background_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks.shutdown().await, 0);
    }
}
