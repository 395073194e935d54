// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::run::Run;
use crate::domain::repositories::errors::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 运行仓库特质
///
/// 定义抓取运行的数据访问接口
#[async_trait]
pub trait RunRepository: Send + Sync {
    /// 创建运行
    async fn create(&self, run: &Run) -> Result<Run, RepositoryError>;
    /// 创建一个已由 `owner` 认领的运行
    async fn create_claimed(&self, run: &Run, owner: Uuid) -> Result<Run, RepositoryError>;
    /// 根据ID查找运行
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Run>, RepositoryError>;
    /// 查找比较基线
    ///
    /// 同一查询下最近一次成功完成的运行（按完成时间倒序取第一个），排除 `exclude_run_id`。
    async fn find_baseline(
        &self,
        query_id: Uuid,
        exclude_run_id: Uuid,
    ) -> Result<Option<Run>, RepositoryError>;
    /// 列出查询的所有运行，按开始时间升序
    async fn list_by_query(&self, query_id: Uuid) -> Result<Vec<Run>, RepositoryError>;
    /// 持久化运行的终止状态、日志和完成时间
    ///
    /// 只有仍处于 Pending 的运行会被写入；已终止的运行返回 `Conflict`，
    /// 不存在的运行返回 `NotFound`。
    async fn finalize(&self, run: &Run) -> Result<(), RepositoryError>;
    /// 以 `owner` 的身份认领指定运行
    ///
    /// 运行必须处于 Pending，且未被认领或已由同一 `owner` 认领。
    /// 返回 `false` 表示运行已被其他执行者持有或已终止。
    async fn claim(&self, run_id: Uuid, owner: Uuid) -> Result<bool, RepositoryError>;
    /// 认领下一个待执行的运行
    async fn claim_next_pending(&self, worker_id: Uuid) -> Result<Option<Run>, RepositoryError>;
}
