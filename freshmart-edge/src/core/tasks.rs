//! 后台任务管理
//!
//! 节点目前只有自动同步一个后台任务；所有任务共享同一个取消令牌，
//! shutdown 时取消并等待每个任务结束 (进行中的同步会先完成)。

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// 后台任务集合
pub struct BackgroundTasks {
    tasks: Vec<(&'static str, JoinHandle<()>)>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// 任务内部监听此令牌以退出循环
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        tracing::debug!(task = name, "Spawning background task");
        self.tasks.push((name, tokio::spawn(future)));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Names of tasks that stopped before shutdown was requested
    pub fn finished(&self) -> Vec<&'static str> {
        if self.shutdown.is_cancelled() {
            return Vec::new();
        }
        self.tasks
            .iter()
            .filter(|(_, handle)| handle.is_finished())
            .map(|(name, _)| *name)
            .collect()
    }

    /// 取消所有任务并等待结束，返回 panic 的任务数
    pub async fn shutdown(self) -> usize {
        tracing::info!(count = self.tasks.len(), "Stopping background tasks");
        self.shutdown.cancel();

        let mut panicked = 0;
        for (name, handle) in self.tasks {
            match handle.await {
                Ok(()) => tracing::debug!(task = name, "Task stopped"),
                Err(e) if e.is_panic() => {
                    panicked += 1;
                    tracing::error!(task = name, error = %e, "Task panicked");
                }
                Err(e) => tracing::warn!(task = name, error = %e, "Task aborted"),
            }
        }
        panicked
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}
