// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::domain::models::page_result::PageResult;
use crate::domain::models::query::{NewQuery, Query, QueryError};
use crate::domain::models::run::{Run, RunStateError, ScrapeStatus};
use crate::domain::models::serp_item::OrganicEntry;
use crate::domain::repositories::difference_repository::DifferenceRepository;
use crate::domain::repositories::query_repository::QueryRepository;
use crate::domain::repositories::result_repository::ResultRepository;
use crate::domain::repositories::run_repository::RunRepository;
use crate::domain::repositories::RepositoryError;
use crate::domain::search::provider::{ProviderError, RankingProvider};
use crate::domain::services::content_extractor::{ContentExtractor, ExtractionError};
use crate::domain::services::diff_engine::DiffEngine;
use crate::engines::browser_engine::BrowserSession;
use crate::engines::traits::{FetchError, PageFetcher};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn, Span};
use uuid::Uuid;

/// 编排错误
///
/// 只在运行无法被加载或无法写回终止状态时返回；
/// 排名服务失败等运行内错误会记录在运行上，不会出现在这里。
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Run not found: {0}")]
    RunNotFound(Uuid),
    #[error("Query not found: {0}")]
    QueryNotFound(Uuid),
    #[error("Run {0} is held by another executor")]
    AlreadyClaimed(Uuid),
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),
    #[error(transparent)]
    RunState(#[from] RunStateError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 中止运行的错误，文本即运行日志
#[derive(Error, Debug)]
enum RunAbort {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 单条结果的失败原因
#[derive(Error, Debug)]
pub enum PageFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// 单条结果的处理结果
#[derive(Debug)]
pub enum PageOutcome {
    Extracted(String),
    Failed(PageFailure),
}

/// 一次运行的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub status: ScrapeStatus,
    /// 已保存的结果数
    pub results: usize,
    /// 提取失败的结果数
    pub failed_results: usize,
    /// 已保存的差异数
    pub differences: usize,
    /// 其中有变化的差异数
    pub changed: usize,
    pub log: Option<String>,
}

/// 编排器使用的存储
#[derive(Clone)]
pub struct RunStores {
    pub queries: Arc<dyn QueryRepository>,
    pub runs: Arc<dyn RunRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub differences: Arc<dyn DifferenceRepository>,
}

/// 运行编排器
///
/// 驱动一次运行：获取排名、逐条抓取提取、与基线比较、写回终止状态。
/// 同一运行内的抓取严格顺序执行，浏览器会话由本次调用独占。
pub struct RunOrchestrator {
    stores: RunStores,
    provider: Arc<dyn RankingProvider>,
    fetcher: Arc<dyn PageFetcher>,
    extractor: ContentExtractor,
    browser: BrowserSettings,
}

impl RunOrchestrator {
    pub fn new(
        stores: RunStores,
        provider: Arc<dyn RankingProvider>,
        fetcher: Arc<dyn PageFetcher>,
        extractor: ContentExtractor,
        browser: BrowserSettings,
    ) -> Self {
        Self {
            stores,
            provider,
            fetcher,
            extractor,
            browser,
        }
    }

    /// 登记查询并创建一个待执行的运行
    ///
    /// 相同文本的查询已存在时复用，不会重复创建。运行由工作器异步执行。
    pub async fn track(&self, new_query: NewQuery) -> Result<(Query, Run), OrchestratorError> {
        let candidate = new_query.into_query()?;
        let query = match self.stores.queries.find_by_text(&candidate.text).await? {
            Some(existing) => existing,
            None => self.stores.queries.create(&candidate).await?,
        };

        let run = self.stores.runs.create(&Run::new(query.id)).await?;
        info!("Queued run {} for {}", run.id, query.text);
        Ok((query, run))
    }

    /// 为查询创建一次运行并立即执行
    ///
    /// 运行在创建时即被本次调用认领，工作器不会再拾取它。
    pub async fn run_query(&self, query: &Query) -> Result<RunOutcome, OrchestratorError> {
        let owner = Uuid::new_v4();
        let run = self
            .stores
            .runs
            .create_claimed(&Run::new(query.id), owner)
            .await?;
        self.execute_as(run.id, owner).await
    }

    /// 执行一个已创建的 Pending 运行
    pub async fn execute(&self, run_id: Uuid) -> Result<RunOutcome, OrchestratorError> {
        self.execute_as(run_id, Uuid::new_v4()).await
    }

    /// 以 `owner` 的身份认领并执行运行
    ///
    /// 运行已被其他执行者持有时返回 `AlreadyClaimed`，不做任何处理。
    #[instrument(skip(self), fields(query = tracing::field::Empty))]
    pub async fn execute_as(&self, run_id: Uuid, owner: Uuid) -> Result<RunOutcome, OrchestratorError> {
        let mut run = self
            .stores
            .runs
            .find_by_id(run_id)
            .await?
            .ok_or(OrchestratorError::RunNotFound(run_id))?;
        if run.status.is_terminal() {
            return Err(RunStateError::AlreadyFinished(run.id, run.status).into());
        }
        if !self.stores.runs.claim(run_id, owner).await? {
            return Err(OrchestratorError::AlreadyClaimed(run_id));
        }

        let query = self
            .stores
            .queries
            .find_by_id(run.query_id)
            .await?
            .ok_or(OrchestratorError::QueryNotFound(run.query_id))?;
        Span::current().record("query", query.text.as_str());
        info!("Scraping started for {}", query.text);

        let mut outcome = RunOutcome {
            run_id,
            ..RunOutcome::default()
        };
        let mut session = BrowserSession::new(self.browser.clone());
        let processed = self.process(&run, &query, &mut session, &mut outcome).await;
        session.release().await;

        match processed {
            Ok(()) => {
                info!(
                    "Scraping finished for {}: {} results, {} differences",
                    query.text, outcome.results, outcome.differences
                );
                run.finish(ScrapeStatus::Success, None)?;
            }
            Err(e) => {
                error!("Run {} failed: {}", run_id, e);
                run.finish(ScrapeStatus::Failed, Some(e.to_string()))?;
            }
        }

        self.stores.runs.finalize(&run).await?;
        metrics::counter!("serpdiff_runs_total", "status" => run.status.to_string()).increment(1);

        outcome.status = run.status;
        outcome.log = run.log;
        Ok(outcome)
    }

    async fn process(
        &self,
        run: &Run,
        query: &Query,
        session: &mut BrowserSession,
        outcome: &mut RunOutcome,
    ) -> Result<(), RunAbort> {
        let baseline = self.stores.runs.find_baseline(query.id, run.id).await?;
        if baseline.is_none() {
            info!("No completed baseline for {}, differences disabled", query.text);
        }

        let items = self.provider.fetch_serp(&query.text).await?;
        let entries: Vec<OrganicEntry> = items
            .into_iter()
            .filter(|item| item.is_organic())
            .filter_map(|item| {
                let entry = item.clone().into_organic();
                if entry.is_none() {
                    warn!("Skipping organic item without url or rank: {:?}", item);
                }
                entry
            })
            .collect();
        info!("{} returned {} organic results", self.provider.name(), entries.len());

        for entry in entries {
            let skeleton = PageResult::skeleton(run.id, entry.title, entry.url, entry.rank);
            let result = match self.fetch_page(&skeleton.page_link, &query.text, session).await {
                PageOutcome::Extracted(content) => skeleton.succeed(content),
                PageOutcome::Failed(reason) => {
                    warn!("Error in requesting page {}: {}", skeleton.page_link, reason);
                    outcome.failed_results += 1;
                    skeleton.fail(reason)
                }
            };
            self.stores.results.save(&result).await?;
            outcome.results += 1;
            metrics::counter!("serpdiff_results_total", "status" => result.status.to_string())
                .increment(1);

            let Some(baseline) = baseline.as_ref() else {
                continue;
            };
            if !result.is_usable() {
                continue;
            }
            let Some(earlier) = self
                .stores
                .results
                .find_successful_by_run_and_url(baseline.id, &result.page_link)
                .await?
            else {
                continue;
            };

            let difference = DiffEngine::compare(&earlier, &result);
            self.stores.differences.create(&difference).await?;
            outcome.differences += 1;
            if difference.has_difference {
                outcome.changed += 1;
            }
            metrics::counter!(
                "serpdiff_differences_total",
                "changed" => difference.has_difference.to_string()
            )
            .increment(1);
        }

        Ok(())
    }

    async fn fetch_page(&self, url: &str, query: &str, session: &mut BrowserSession) -> PageOutcome {
        info!("Fetching page content for {}", url);
        let raw = match self.fetcher.fetch(url, session).await {
            Ok(raw) => raw,
            Err(e) => return PageOutcome::Failed(e.into()),
        };

        match self.extractor.extract(&raw, query) {
            Ok(text) => PageOutcome::Extracted(text),
            Err(e) => PageOutcome::Failed(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "run_orchestrator_test.rs"]
mod tests;
