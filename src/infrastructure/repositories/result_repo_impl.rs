// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::page_result::PageResult;
use crate::domain::models::run::ScrapeStatus;
use crate::domain::repositories::result_repository::ResultRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::page_result as result_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 结果仓库实现
pub struct ResultRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ResultRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<result_entity::Model> for PageResult {
    type Error = RepositoryError;

    fn try_from(m: result_entity::Model) -> Result<Self, Self::Error> {
        let status = m.page_scrape_status.parse().map_err(|_| {
            RepositoryError::Corrupted(format!("result {} has status {}", m.id, m.page_scrape_status))
        })?;
        let page_ranking = u32::try_from(m.page_ranking).map_err(|_| {
            RepositoryError::Corrupted(format!("result {} has rank {}", m.id, m.page_ranking))
        })?;

        Ok(Self {
            id: m.id,
            run_id: m.scrape_id,
            page_title: m.page_title,
            page_link: m.page_link,
            page_ranking,
            page_content_text: m.page_content_text,
            status,
            log: m.page_scrape_log,
            created_at: m.created_at.with_timezone(&Utc),
        })
    }
}

fn collect(models: Vec<result_entity::Model>) -> Result<Vec<PageResult>, RepositoryError> {
    models.into_iter().map(PageResult::try_from).collect()
}

#[async_trait]
impl ResultRepository for ResultRepositoryImpl {
    async fn save(&self, result: &PageResult) -> Result<(), RepositoryError> {
        let page_ranking = i32::try_from(result.page_ranking).map_err(|_| {
            RepositoryError::Invalid(format!("result {} has rank {}", result.id, result.page_ranking))
        })?;
        let active_model = result_entity::ActiveModel {
            id: Set(result.id),
            scrape_id: Set(result.run_id),
            page_title: Set(result.page_title.clone()),
            page_link: Set(result.page_link.clone()),
            page_ranking: Set(page_ranking),
            page_content_text: Set(result.page_content_text.clone()),
            page_scrape_status: Set(result.status.to_string()),
            page_scrape_log: Set(result.log.clone()),
            created_at: Set(result.created_at.into()),
        };

        result_entity::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PageResult>, RepositoryError> {
        result_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(PageResult::try_from)
            .transpose()
    }

    async fn find_successful_by_run_and_url(
        &self,
        run_id: Uuid,
        url: &str,
    ) -> Result<Option<PageResult>, RepositoryError> {
        result_entity::Entity::find()
            .filter(result_entity::Column::ScrapeId.eq(run_id))
            .filter(result_entity::Column::PageLink.eq(url))
            .filter(result_entity::Column::PageScrapeStatus.eq(ScrapeStatus::Success.to_string()))
            .order_by_desc(result_entity::Column::CreatedAt)
            .one(self.db.as_ref())
            .await?
            .map(PageResult::try_from)
            .transpose()
    }

    async fn list_by_run(&self, run_id: Uuid) -> Result<Vec<PageResult>, RepositoryError> {
        let models = result_entity::Entity::find()
            .filter(result_entity::Column::ScrapeId.eq(run_id))
            .order_by_asc(result_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        collect(models)
    }

    async fn list_by_runs(&self, run_ids: &[Uuid]) -> Result<Vec<PageResult>, RepositoryError> {
        if run_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = result_entity::Entity::find()
            .filter(result_entity::Column::ScrapeId.is_in(run_ids.iter().copied()))
            .order_by_asc(result_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        collect(models)
    }
}
