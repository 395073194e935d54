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

use crate::domain::models::run::{Run, ScrapeStatus};
use crate::domain::repositories::run_repository::RunRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::scrape as scrape_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 运行仓库实现
///
/// 基于SeaORM实现的运行（scrapes 表）数据访问层
#[derive(Clone)]
pub struct RunRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl RunRepositoryImpl {
    /// 创建新的运行仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<scrape_entity::Model> for Run {
    type Error = RepositoryError;

    fn try_from(model: scrape_entity::Model) -> Result<Self, Self::Error> {
        let status = model.status.parse().map_err(|_| {
            RepositoryError::Corrupted(format!("run {} has status {}", model.id, model.status))
        })?;

        Ok(Self {
            id: model.id,
            query_id: model.query_id,
            started_at: model.started_at.with_timezone(&Utc),
            completed_at: model.completed_at.map(|t| t.with_timezone(&Utc)),
            status,
            log: model.log,
        })
    }
}

impl From<&Run> for scrape_entity::ActiveModel {
    fn from(run: &Run) -> Self {
        Self {
            id: Set(run.id),
            query_id: Set(run.query_id),
            started_at: Set(run.started_at.into()),
            completed_at: Set(run.completed_at.map(Into::into)),
            status: Set(run.status.to_string()),
            log: Set(run.log.clone()),
            claimed_by: Set(None),
            claimed_at: Set(None),
        }
    }
}

#[async_trait]
impl RunRepository for RunRepositoryImpl {
    async fn create(&self, run: &Run) -> Result<Run, RepositoryError> {
        let model: scrape_entity::ActiveModel = run.into();

        model.insert(self.db.as_ref()).await?.try_into()
    }

    async fn create_claimed(&self, run: &Run, owner: Uuid) -> Result<Run, RepositoryError> {
        let mut model: scrape_entity::ActiveModel = run.into();
        model.claimed_by = Set(Some(owner));
        model.claimed_at = Set(Some(Utc::now().into()));

        model.insert(self.db.as_ref()).await?.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Run>, RepositoryError> {
        scrape_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Run::try_from)
            .transpose()
    }

    async fn find_baseline(
        &self,
        query_id: Uuid,
        exclude_run_id: Uuid,
    ) -> Result<Option<Run>, RepositoryError> {
        scrape_entity::Entity::find()
            .filter(scrape_entity::Column::QueryId.eq(query_id))
            .filter(scrape_entity::Column::Id.ne(exclude_run_id))
            .filter(scrape_entity::Column::Status.eq(ScrapeStatus::Success.to_string()))
            .filter(scrape_entity::Column::CompletedAt.is_not_null())
            .order_by_desc(scrape_entity::Column::CompletedAt)
            .one(self.db.as_ref())
            .await?
            .map(Run::try_from)
            .transpose()
    }

    async fn list_by_query(&self, query_id: Uuid) -> Result<Vec<Run>, RepositoryError> {
        scrape_entity::Entity::find()
            .filter(scrape_entity::Column::QueryId.eq(query_id))
            .order_by_asc(scrape_entity::Column::StartedAt)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Run::try_from)
            .collect()
    }

    async fn finalize(&self, run: &Run) -> Result<(), RepositoryError> {
        let completed_at: Option<chrono::DateTime<chrono::FixedOffset>> =
            run.completed_at.map(Into::into);

        let updated = scrape_entity::Entity::update_many()
            .col_expr(scrape_entity::Column::Status, Expr::value(run.status.to_string()))
            .col_expr(scrape_entity::Column::Log, Expr::value(run.log.clone()))
            .col_expr(scrape_entity::Column::CompletedAt, Expr::value(completed_at))
            .filter(scrape_entity::Column::Id.eq(run.id))
            .filter(scrape_entity::Column::Status.eq(ScrapeStatus::Pending.to_string()))
            .exec(self.db.as_ref())
            .await?;

        if updated.rows_affected > 0 {
            return Ok(());
        }

        match self.find_by_id(run.id).await? {
            Some(stored) => Err(RepositoryError::Conflict(format!(
                "run {} is already {}",
                stored.id, stored.status
            ))),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn claim(&self, run_id: Uuid, owner: Uuid) -> Result<bool, RepositoryError> {
        let updated = scrape_entity::Entity::update_many()
            .col_expr(scrape_entity::Column::ClaimedBy, Expr::value(Some(owner)))
            .col_expr(
                scrape_entity::Column::ClaimedAt,
                Expr::value(Some(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now()))),
            )
            .filter(scrape_entity::Column::Id.eq(run_id))
            .filter(scrape_entity::Column::Status.eq(ScrapeStatus::Pending.to_string()))
            .filter(
                Condition::any()
                    .add(scrape_entity::Column::ClaimedBy.is_null())
                    .add(scrape_entity::Column::ClaimedBy.eq(owner)),
            )
            .exec(self.db.as_ref())
            .await?;

        Ok(updated.rows_affected > 0)
    }

    async fn claim_next_pending(&self, worker_id: Uuid) -> Result<Option<Run>, RepositoryError> {
        // 条件更新是唯一的认领点，被其他工作器抢先的候选会在下一轮查询中消失
        loop {
            let candidate = scrape_entity::Entity::find()
                .filter(scrape_entity::Column::Status.eq(ScrapeStatus::Pending.to_string()))
                .filter(scrape_entity::Column::ClaimedBy.is_null())
                .order_by_asc(scrape_entity::Column::StartedAt)
                .one(self.db.as_ref())
                .await?;

            let Some(candidate) = candidate else {
                return Ok(None);
            };

            if self.claim(candidate.id, worker_id).await? {
                return self.find_by_id(candidate.id).await;
            }
        }
    }
}
