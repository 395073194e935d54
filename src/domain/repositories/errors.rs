// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 存储的数据无法还原为领域对象
    #[error("Corrupted record: {0}")]
    Corrupted(String),
    /// 领域值超出存储列的范围
    #[error("Invalid record: {0}")]
    Invalid(String),
    /// 记录状态不允许此次写入
    #[error("Conflict: {0}")]
    Conflict(String),
}
