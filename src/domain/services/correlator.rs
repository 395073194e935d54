// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::page_result::PageResult;
use crate::domain::repositories::result_repository::ResultRepository;
use crate::domain::repositories::run_repository::RunRepository;
use crate::domain::repositories::RepositoryError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// 关联错误
#[derive(Error, Debug)]
pub enum CorrelationError {
    #[error("Runs {0} and {1} belong to different queries")]
    CrossQuery(Uuid, Uuid),
    #[error("Run not found: {0}")]
    RunNotFound(Uuid),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 两次运行之间排名链接集合的变化
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrlDelta {
    /// 不在较早运行中、但在其他历史运行中出现过的链接
    pub added: BTreeSet<String>,
    /// 在较早运行中、不在较晚运行中的链接
    pub removed: BTreeSet<String>,
    /// 在该查询的历史中第一次出现的链接
    pub uniquely_added: BTreeSet<String>,
}

/// 计算链接变化
///
/// `history` 为该查询除 `run_b` 之外所有运行的结果，不区分提取状态。
pub fn compute_url_delta<'a>(
    run_a: &[PageResult],
    run_b: &[PageResult],
    history: impl IntoIterator<Item = &'a PageResult>,
) -> UrlDelta {
    let urls_a = successful_urls(run_a);
    let urls_b = successful_urls(run_b);
    let historical: BTreeSet<&str> = history.into_iter().map(|r| r.page_link.as_str()).collect();

    let removed = urls_a.difference(&urls_b).map(|u| u.to_string()).collect();
    let uniquely_added: BTreeSet<String> = urls_b
        .iter()
        .filter(|u| !historical.contains(*u))
        .map(|u| u.to_string())
        .collect();
    let added = urls_b
        .difference(&urls_a)
        .filter(|u| !uniquely_added.contains(**u))
        .map(|u| u.to_string())
        .collect();

    UrlDelta {
        added,
        removed,
        uniquely_added,
    }
}

fn successful_urls(results: &[PageResult]) -> BTreeSet<&str> {
    results
        .iter()
        .filter(|r| r.is_usable())
        .map(|r| r.page_link.as_str())
        .collect()
}

/// 关联器
///
/// 直接基于已存储的结果比较同一查询的两次运行
pub struct Correlator {
    runs: Arc<dyn RunRepository>,
    results: Arc<dyn ResultRepository>,
}

impl Correlator {
    pub fn new(runs: Arc<dyn RunRepository>, results: Arc<dyn ResultRepository>) -> Self {
        Self { runs, results }
    }

    /// 计算 `run_a` 到 `run_b` 的链接变化
    pub async fn url_delta(&self, run_a: Uuid, run_b: Uuid) -> Result<UrlDelta, CorrelationError> {
        let first = self
            .runs
            .find_by_id(run_a)
            .await?
            .ok_or(CorrelationError::RunNotFound(run_a))?;
        let second = self
            .runs
            .find_by_id(run_b)
            .await?
            .ok_or(CorrelationError::RunNotFound(run_b))?;

        if first.query_id != second.query_id {
            return Err(CorrelationError::CrossQuery(run_a, run_b));
        }

        let history_ids: Vec<Uuid> = self
            .runs
            .list_by_query(first.query_id)
            .await?
            .into_iter()
            .map(|run| run.id)
            .filter(|id| *id != run_b)
            .collect();

        let history = self.results.list_by_runs(&history_ids).await?;
        let results_b = self.results.list_by_run(run_b).await?;
        let results_a: Vec<PageResult> = history.iter().filter(|r| r.run_id == run_a).cloned().collect();

        debug!(
            "Correlating runs {} and {} over {} historical results",
            run_a,
            run_b,
            history.len()
        );

        Ok(compute_url_delta(&results_a, &results_b, &history))
    }
}
