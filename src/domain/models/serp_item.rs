// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 排名服务返回的单个条目
///
/// 条目可能是自然结果、广告、知识面板等，只有 `organic` 类型会被处理。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub rank_absolute: Option<u32>,
}

/// 可处理的自然排名条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganicEntry {
    pub title: String,
    pub url: String,
    pub rank: u32,
}

impl SerpItem {
    pub fn organic(title: &str, url: &str, rank: u32) -> Self {
        Self {
            item_type: "organic".to_string(),
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            rank_absolute: Some(rank),
        }
    }

    pub fn is_organic(&self) -> bool {
        self.item_type == "organic"
    }

    /// 转换为自然排名条目
    ///
    /// 非自然条目，或缺少URL、排名（排名必须从1开始）的条目返回 None。
    pub fn into_organic(self) -> Option<OrganicEntry> {
        if !self.is_organic() {
            return None;
        }
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        let rank = self.rank_absolute.filter(|r| *r > 0)?;

        Some(OrganicEntry {
            title: self.title.unwrap_or_default(),
            url,
            rank,
        })
    }
}
