// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serpdiff::config::settings::Settings;
use serpdiff::domain::models::query::NewQuery;
use serpdiff::domain::services::content_extractor::ContentExtractor;
use serpdiff::domain::services::run_orchestrator::{RunOrchestrator, RunStores};
use serpdiff::engines::router::FetchStrategySelector;
use serpdiff::infrastructure::database::connection;
use serpdiff::infrastructure::repositories::difference_repo_impl::DifferenceRepositoryImpl;
use serpdiff::infrastructure::repositories::query_repo_impl::QueryRepositoryImpl;
use serpdiff::infrastructure::repositories::result_repo_impl::ResultRepositoryImpl;
use serpdiff::infrastructure::repositories::run_repo_impl::RunRepositoryImpl;
use serpdiff::infrastructure::search::DataForSeoProvider;
use serpdiff::workers::manager::WorkerManager;
use serpdiff::workers::run_worker::RunWorker;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use migration::{Migrator, MigratorTrait};
use serpdiff::utils::telemetry;

/// 主函数
///
/// 初始化各组件并启动运行工作器。命令行参数中的每个查询会被登记，
/// 并各自排入一个待执行的运行。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting serpdiff...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    serpdiff::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Wire the pipeline
    let stores = RunStores {
        queries: Arc::new(QueryRepositoryImpl::new(db.clone())),
        runs: Arc::new(RunRepositoryImpl::new(db.clone())),
        results: Arc::new(ResultRepositoryImpl::new(db.clone())),
        differences: Arc::new(DifferenceRepositoryImpl::new(db.clone())),
    };
    let provider = Arc::new(DataForSeoProvider::new(settings.provider.clone())?);
    let fetcher = Arc::new(FetchStrategySelector::new(&settings.fetch, &settings.browser)?);
    let orchestrator = Arc::new(RunOrchestrator::new(
        stores.clone(),
        provider,
        fetcher,
        ContentExtractor::new(settings.extraction.window_chars),
        settings.browser.clone(),
    ));

    for text in std::env::args().skip(1) {
        let (query, run) = orchestrator.track(NewQuery::new(text, 1)).await?;
        info!("Tracking '{}' with run {}", query.text, run.id);
    }

    // 5. Start workers
    let mut manager = WorkerManager::new();
    let poll_interval = Duration::from_millis(settings.worker.poll_interval_ms);
    for _ in 0..settings.worker.count.max(1) {
        manager.spawn(Arc::new(RunWorker::new(
            stores.runs.clone(),
            orchestrator.clone(),
            poll_interval,
        )));
    }
    info!("{} run workers started", manager.len());

    manager.wait_for_shutdown().await;
    Ok(())
}
