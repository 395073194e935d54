// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::page_result::PageResult;
use crate::domain::repositories::errors::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 结果仓库特质
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// 保存结果
    async fn save(&self, result: &PageResult) -> Result<(), RepositoryError>;
    /// 根据ID查找结果
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PageResult>, RepositoryError>;
    /// 查找某次运行中指定URL的成功结果
    ///
    /// 同一运行中出现重复URL时返回最后写入的一条。
    async fn find_successful_by_run_and_url(
        &self,
        run_id: Uuid,
        url: &str,
    ) -> Result<Option<PageResult>, RepositoryError>;
    /// 列出运行的所有结果，按写入顺序
    async fn list_by_run(&self, run_id: Uuid) -> Result<Vec<PageResult>, RepositoryError>;
    /// 列出多个运行的所有结果
    async fn list_by_runs(&self, run_ids: &[Uuid]) -> Result<Vec<PageResult>, RepositoryError>;
}
