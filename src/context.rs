use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use crate::api::rest::{create_router, ApiState};
use crate::config::loader::AppConfig;
use crate::error::Result;
use crate::fee_sources::connectors::blockstream::BlockstreamClient;
use crate::fee_sources::connectors::etherscan::EtherscanClient;
use crate::interfaces::sample_store::SampleStore;
use crate::sampling::collector::SampleCollector;
use crate::sampling::pipeline::SamplePipeline;
use crate::sampling::scheduler::{AlignedCadence, Scheduler};
use crate::store::sqlite::SqliteSampleStore;
use crate::utils::task_supervisor::TaskSupervisor;

const SCHEDULER_TASK: &str = "fee_scheduler";

/// Everything a running service shares: configuration, the store handle and
/// the pipeline built on top of them.
pub struct AppContext {
    pub config: AppConfig,
    pub store: Arc<SqliteSampleStore>,
    pub pipeline: Arc<SamplePipeline>,
}

impl AppContext {
    /// Connect the store and wire up the pipeline. A store that cannot be
    /// reached is an error; callers must not serve or schedule without it.
    pub async fn connect(config: AppConfig) -> Result<Self> {
        let store = Arc::new(
            SqliteSampleStore::connect(&config.store.url, config.store.max_connections).await?,
        );

        let http = reqwest::Client::new();
        let collector = SampleCollector::new(
            Arc::new(BlockstreamClient::new(http.clone(), &config.sources.btc_url)),
            Arc::new(EtherscanClient::new(http, &config.sources.eth_url, &config.sources.eth_api_key)),
        );

        let pipeline = Arc::new(SamplePipeline::new(
            collector,
            store.clone() as Arc<dyn SampleStore>,
            config.sampling.failure_policy,
        ));

        Ok(AppContext { config, store, pipeline })
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(
            self.pipeline.clone(),
            Box::new(AlignedCadence::new(self.config.schedule.cadence())),
            self.config.schedule.run_on_startup,
        )
    }

    /// Run the scheduler and the read API on an already bound `listener`
    /// until `shutdown` resolves. An in-flight run then gets `grace` to
    /// finish before it is aborted.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F, grace: Duration) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut supervisor = TaskSupervisor::new();
        supervisor.spawn(SCHEDULER_TASK, self.scheduler().run(shutdown_rx));

        let state = Arc::new(ApiState {
            store: self.store.clone() as Arc<dyn SampleStore>,
        });

        let served = axum::serve(listener, create_router(state))
            .with_graceful_shutdown(shutdown)
            .await;

        let _ = shutdown_tx.send(true);
        if let Err(e) = supervisor.wait_for_task_or_abort(SCHEDULER_TASK, grace).await {
            tracing::error!("{}", e);
        }
        supervisor.shutdown_all().await;

        Ok(served?)
    }
}
