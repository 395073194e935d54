// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::run_repository::RunRepository;
use crate::domain::services::run_orchestrator::{RunOrchestrator, RunOutcome};
use crate::workers::worker::{Worker, WorkerError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// 运行工作器
///
/// 认领最早的待执行运行并交给编排器；没有可执行的运行时按轮询间隔休眠。
/// 每个工作器同一时刻只执行一个运行。
pub struct RunWorker {
    worker_id: Uuid,
    name: String,
    runs: Arc<dyn RunRepository>,
    orchestrator: Arc<RunOrchestrator>,
    poll_interval: Duration,
}

impl RunWorker {
    pub fn new(
        runs: Arc<dyn RunRepository>,
        orchestrator: Arc<RunOrchestrator>,
        poll_interval: Duration,
    ) -> Self {
        let worker_id = Uuid::new_v4();
        Self {
            worker_id,
            name: format!("run-worker-{}", worker_id),
            runs,
            orchestrator,
            poll_interval,
        }
    }

    /// 处理下一个待执行的运行
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(RunOutcome))` - 执行了一个运行
    /// * `Ok(None)` - 当前没有待执行的运行
    #[instrument(skip(self), fields(worker_id = %self.worker_id))]
    pub async fn process_next(&self) -> Result<Option<RunOutcome>, WorkerError> {
        let Some(run) = self.runs.claim_next_pending(self.worker_id).await? else {
            return Ok(None);
        };

        info!("Claimed run {}", run.id);
        let outcome = self.orchestrator.execute_as(run.id, self.worker_id).await?;
        Ok(Some(outcome))
    }
}

#[async_trait]
impl Worker for RunWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        info!("Run worker {} started", self.worker_id);

        loop {
            match self.process_next().await {
                Ok(Some(_)) => {}
                Ok(None) => sleep(self.poll_interval).await,
                Err(e) => {
                    error!("Error processing run: {}", e);
                    sleep(self.poll_interval).await;
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
