// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::query::Query;
use crate::domain::repositories::query_repository::QueryRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::query as query_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 查询仓库实现
#[derive(Clone)]
pub struct QueryRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl QueryRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<query_entity::Model> for Query {
    type Error = RepositoryError;

    fn try_from(model: query_entity::Model) -> Result<Self, Self::Error> {
        let interval_months = u32::try_from(model.interval_no_of_months).map_err(|_| {
            RepositoryError::Corrupted(format!(
                "query {} has interval {}",
                model.id, model.interval_no_of_months
            ))
        })?;

        Ok(Self {
            id: model.id,
            text: model.query,
            interval_months,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl QueryRepository for QueryRepositoryImpl {
    async fn create(&self, query: &Query) -> Result<Query, RepositoryError> {
        let interval_no_of_months = i32::try_from(query.interval_months).map_err(|_| {
            RepositoryError::Invalid(format!("query {} has interval {}", query.id, query.interval_months))
        })?;
        let model = query_entity::ActiveModel {
            id: Set(query.id),
            query: Set(query.text.clone()),
            interval_no_of_months: Set(interval_no_of_months),
            created_at: Set(query.created_at.into()),
        };

        model.insert(self.db.as_ref()).await?.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Query>, RepositoryError> {
        query_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Query::try_from)
            .transpose()
    }

    async fn find_by_text(&self, text: &str) -> Result<Option<Query>, RepositoryError> {
        query_entity::Entity::find()
            .filter(query_entity::Column::Query.eq(text))
            .one(self.db.as_ref())
            .await?
            .map(Query::try_from)
            .transpose()
    }
}
