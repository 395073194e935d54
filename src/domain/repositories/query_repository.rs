// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::query::Query;
use crate::domain::repositories::errors::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 查询仓库特质
#[async_trait]
pub trait QueryRepository: Send + Sync {
    /// 创建查询
    async fn create(&self, query: &Query) -> Result<Query, RepositoryError>;
    /// 根据ID查找查询
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Query>, RepositoryError>;
    /// 根据查询文本查找
    async fn find_by_text(&self, text: &str) -> Result<Option<Query>, RepositoryError>;
}
