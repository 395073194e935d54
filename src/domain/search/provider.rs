// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::serp_item::SerpItem;
use async_trait::async_trait;
use thiserror::Error;

/// 排名服务错误
///
/// 任何此类错误都会导致整个运行失败。
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Ranking provider request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Ranking provider returned status {status_code}: {message}")]
    Api { status_code: i64, message: String },
    #[error("Malformed ranking provider response: {0}")]
    Malformed(String),
}

/// 排名结果提供者
#[async_trait]
pub trait RankingProvider: Send + Sync {
    /// 获取查询的有序排名条目（包含非自然条目）
    async fn fetch_serp(&self, query: &str) -> Result<Vec<SerpItem>, ProviderError>;

    /// 提供者名称
    fn name(&self) -> &'static str;
}
