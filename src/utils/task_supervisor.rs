use tokio::task::JoinHandle;
use std::collections::HashMap;
use std::time::Duration;
use crate::error::{Error, Result};
use tracing::{info, warn};

/// Task Supervisor - Owns the service's named background tasks
///
/// ## Usage
/// ```rust,ignore
/// let mut supervisor = TaskSupervisor::new();
/// supervisor.spawn("fee_scheduler", scheduler.run(shutdown_rx));
///
/// // on shutdown
/// shutdown_tx.send(true)?;
/// supervisor.wait_for_task_or_abort("fee_scheduler", Duration::from_secs(30)).await?;
/// ```
pub struct TaskSupervisor {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl TaskSupervisor {
    pub fn new() -> Self {
        TaskSupervisor {
            tasks: HashMap::new(),
        }
    }

    /// Spawn a new background task and register it under `name`
    pub fn spawn<F>(&mut self, name: impl Into<String>, future: F) -> &mut Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let handle = tokio::spawn(future);

        info!("Spawned background task: {}", name);
        if let Some(previous) = self.tasks.insert(name.clone(), handle) {
            warn!("Replaced running task {}, aborting the old one", name);
            previous.abort();
        }
        self
    }

    pub fn active_task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Wait up to `grace` for a task, aborting it if it is still running
    pub async fn wait_for_task_or_abort(&mut self, name: &str, grace: Duration) -> Result<()> {
        let mut handle = self.tasks.remove(name)
            .ok_or_else(|| Error::TaskFailed(format!("Task {} not found", name)))?;

        match tokio::time::timeout(grace, &mut handle).await {
            Ok(joined) => {
                joined.map_err(|e| Error::TaskFailed(format!("Task {} failed: {}", name, e)))?;
                info!("Task {} completed", name);
                Ok(())
            }
            Err(_) => {
                handle.abort();
                warn!("Task {} still running after {:?}, aborted", name, grace);
                Err(Error::TaskFailed(format!("Task {} did not finish within {:?}", name, grace)))
            }
        }
    }

    /// Abort everything still registered
    pub async fn shutdown_all(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        info!("Shutting down {} background tasks", self.tasks.len());

        for (name, handle) in self.tasks.drain() {
            handle.abort();
            info!("Aborted task: {}", name);
        }
    }
}

impl Default for TaskSupervisor {
    fn default() -> Self {
        Self::new()
    }
}
