use freshmart_edge::{AppState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    let config = setup_environment()?;

    print_banner();
    tracing::info!(
        work_dir = %config.work_dir,
        environment = %config.environment,
        "FreshMart edge node starting..."
    );

    // 2. 初始化节点状态
    let state = AppState::initialize(&config).await?;

    // 3. 启动后台同步
    let tasks = state.start_background_tasks();

    let stats = state.catalog.stats();
    tracing::info!(
        products = stats.total_products,
        low_stock = stats.low_stock_products,
        orders = state.ledger.list().len(),
        agents = state.agents.available_count(&state.ledger.list()),
        "Ready"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    for name in tasks.finished() {
        tracing::warn!(task = name, "Background task had already stopped");
    }
    let panicked = tasks.shutdown().await;
    if panicked > 0 {
        tracing::error!(panicked, "Background tasks panicked during the run");
    }

    // 最后推送一次本地数据
    let outcome = state.sync.push().await;
    tracing::info!(?outcome, "Final sync");
    Ok(())
}
