// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use serpdiff::config::settings::DatabaseSettings;
use serpdiff::domain::models::page_result::PageResult;
use serpdiff::domain::models::query::{NewQuery, Query};
use serpdiff::domain::models::run::{Run, ScrapeStatus};
use serpdiff::domain::services::run_orchestrator::RunStores;
use serpdiff::infrastructure::database::connection;
use serpdiff::infrastructure::repositories::difference_repo_impl::DifferenceRepositoryImpl;
use serpdiff::infrastructure::repositories::query_repo_impl::QueryRepositoryImpl;
use serpdiff::infrastructure::repositories::result_repo_impl::ResultRepositoryImpl;
use serpdiff::infrastructure::repositories::run_repo_impl::RunRepositoryImpl;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// 已迁移的内存数据库及其仓库
pub struct TestDb {
    pub db: Arc<DatabaseConnection>,
    pub stores: RunStores,
}

pub async fn setup_db() -> TestDb {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: None,
        min_connections: None,
        connect_timeout: Some(5),
        idle_timeout: None,
    };
    let db = Arc::new(connection::create_pool(&settings).await.unwrap());
    Migrator::up(db.as_ref(), None).await.unwrap();

    let stores = RunStores {
        queries: Arc::new(QueryRepositoryImpl::new(db.clone())),
        runs: Arc::new(RunRepositoryImpl::new(db.clone())),
        results: Arc::new(ResultRepositoryImpl::new(db.clone())),
        differences: Arc::new(DifferenceRepositoryImpl::new(db.clone())),
    };

    TestDb { db, stores }
}

pub async fn create_query(stores: &RunStores, text: &str) -> Query {
    let query = NewQuery::new(text, 1).into_query().unwrap();
    stores.queries.create(&query).await.unwrap()
}

/// 创建一个已成功结束的运行，`minutes_ago` 控制开始与完成时间的先后
pub async fn finished_run(stores: &RunStores, query_id: uuid::Uuid, minutes_ago: i64) -> Run {
    let mut run = Run::new(query_id);
    run.started_at = Utc::now() - Duration::minutes(minutes_ago);
    let mut run = stores.runs.create(&run).await.unwrap();
    run.finish(ScrapeStatus::Success, None).unwrap();
    run.completed_at = Some(run.started_at + Duration::seconds(30));
    stores.runs.finalize(&run).await.unwrap();
    run
}

pub async fn save_result(
    stores: &RunStores,
    run_id: uuid::Uuid,
    url: &str,
    rank: u32,
    content: Option<&str>,
) -> PageResult {
    let skeleton = PageResult::skeleton(run_id, format!("Title {}", url), url.to_string(), rank);
    let result = match content {
        Some(text) => skeleton.succeed(text.to_string()),
        None => skeleton.fail("Query not in returned content."),
    };
    stores.results.save(&result).await.unwrap();
    result
}
