// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::difference::Difference;
use crate::domain::repositories::errors::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 差异仓库特质
#[async_trait]
pub trait DifferenceRepository: Send + Sync {
    /// 保存差异
    async fn create(&self, difference: &Difference) -> Result<(), RepositoryError>;
    /// 根据ID查找差异
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Difference>, RepositoryError>;
    /// 列出引用某条结果（任一侧）的差异
    async fn list_by_result(&self, result_id: Uuid) -> Result<Vec<Difference>, RepositoryError>;
}
