// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// 查询校验错误
#[derive(Error, Debug)]
pub enum QueryError {
    /// 字段校验失败
    #[error("Invalid query: {0}")]
    Invalid(#[from] ValidationErrors),
    /// 查询文本去除空白后为空
    #[error("Query text must not be blank")]
    Blank,
}

/// 被跟踪的搜索查询
///
/// 查询文本全局唯一，创建后只有复查间隔可以修改。
/// 何时触发抓取由外部调度器根据 `interval_months` 决定。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// 查询唯一标识符
    pub id: Uuid,
    /// 搜索短语
    pub text: String,
    /// 复查间隔（月）
    pub interval_months: u32,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

/// 新建查询的输入
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewQuery {
    #[validate(length(min = 1, max = 2048))]
    pub text: String,
    #[validate(range(min = 1, max = 12))]
    pub interval_months: u32,
}

impl NewQuery {
    pub fn new(text: impl Into<String>, interval_months: u32) -> Self {
        Self {
            text: text.into(),
            interval_months,
        }
    }

    /// 校验输入并生成查询实体
    ///
    /// 文本两端的空白会被去除，间隔必须在 1 到 12 个月之间。
    pub fn into_query(self) -> Result<Query, QueryError> {
        self.validate()?;
        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(QueryError::Blank);
        }

        Ok(Query {
            id: Uuid::new_v4(),
            text,
            interval_months: self.interval_months,
            created_at: Utc::now(),
        })
    }
}
