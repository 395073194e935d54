// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::run::ScrapeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// 单条自然排名结果
///
/// 一次运行中捕获的一个排名页面及其提取出的正文。
/// 提取失败的结果没有可用内容，不参与差异计算。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// 结果唯一标识符
    pub id: Uuid,
    /// 所属运行ID
    pub run_id: Uuid,
    /// 页面标题
    pub page_title: String,
    /// 页面URL
    pub page_link: String,
    /// 排名位置（从1开始）
    pub page_ranking: u32,
    /// 提取出的正文
    pub page_content_text: String,
    /// 提取状态
    pub status: ScrapeStatus,
    /// 提取日志，失败时记录原因
    pub log: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl PageResult {
    /// 根据排名条目创建结果骨架（Pending 状态，无正文）
    pub fn skeleton(run_id: Uuid, page_title: String, page_link: String, page_ranking: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_id,
            page_title,
            page_link,
            page_ranking,
            page_content_text: String::new(),
            status: ScrapeStatus::Pending,
            log: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn succeed(mut self, content: String) -> Self {
        self.page_content_text = content;
        self.status = ScrapeStatus::Success;
        self.log.clear();
        self
    }

    pub fn fail(mut self, reason: impl Display) -> Self {
        self.page_content_text.clear();
        self.status = ScrapeStatus::Failed;
        self.log = reason.to_string();
        self
    }

    /// 是否可以参与差异比较
    pub fn is_usable(&self) -> bool {
        self.status == ScrapeStatus::Success
    }
}
