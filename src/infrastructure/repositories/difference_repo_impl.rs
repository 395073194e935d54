// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::difference::{DiffLine, Difference};
use crate::domain::repositories::difference_repository::DifferenceRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::difference as difference_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 差异仓库实现
///
/// 差异序列以 `[{"tag": ..., "text": ...}]` 的 JSON 数组保存
pub struct DifferenceRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl DifferenceRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_json(lines: &[DiffLine]) -> Result<serde_json::Value, RepositoryError> {
    serde_json::to_value(lines).map_err(|e| RepositoryError::Corrupted(e.to_string()))
}

fn from_json(id: Uuid, value: serde_json::Value) -> Result<Vec<DiffLine>, RepositoryError> {
    serde_json::from_value(value)
        .map_err(|e| RepositoryError::Corrupted(format!("difference {}: {}", id, e)))
}

impl TryFrom<difference_entity::Model> for Difference {
    type Error = RepositoryError;

    fn try_from(m: difference_entity::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            result1_id: m.result1_id,
            result2_id: m.result2_id,
            content_difference: from_json(m.id, m.content_difference)?,
            title_difference: from_json(m.id, m.title_difference)?,
            ranking_difference: i64::from(m.ranking_difference),
            has_difference: m.has_difference,
            created_at: m.created_at.with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl DifferenceRepository for DifferenceRepositoryImpl {
    async fn create(&self, difference: &Difference) -> Result<(), RepositoryError> {
        let ranking_difference = i32::try_from(difference.ranking_difference).map_err(|_| {
            RepositoryError::Invalid(format!(
                "difference {} has ranking delta {}",
                difference.id, difference.ranking_difference
            ))
        })?;
        let active_model = difference_entity::ActiveModel {
            id: Set(difference.id),
            result1_id: Set(difference.result1_id),
            result2_id: Set(difference.result2_id),
            content_difference: Set(to_json(&difference.content_difference)?),
            title_difference: Set(to_json(&difference.title_difference)?),
            ranking_difference: Set(ranking_difference),
            has_difference: Set(difference.has_difference),
            created_at: Set(difference.created_at.into()),
        };

        difference_entity::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Difference>, RepositoryError> {
        difference_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Difference::try_from)
            .transpose()
    }

    async fn list_by_result(&self, result_id: Uuid) -> Result<Vec<Difference>, RepositoryError> {
        difference_entity::Entity::find()
            .filter(
                Condition::any()
                    .add(difference_entity::Column::Result1Id.eq(result_id))
                    .add(difference_entity::Column::Result2Id.eq(result_id)),
            )
            .order_by_asc(difference_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Difference::try_from)
            .collect()
    }
}
