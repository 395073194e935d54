// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 差异行标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffTag {
    /// 两侧相同
    Unchanged,
    /// 仅存在于较早结果
    OnlyInEarlier,
    /// 仅存在于较晚结果
    OnlyInLater,
}

impl DiffTag {
    /// 行前缀，与统一差异格式一致
    pub fn marker(&self) -> &'static str {
        match self {
            DiffTag::Unchanged => "  ",
            DiffTag::OnlyInEarlier => "- ",
            DiffTag::OnlyInLater => "+ ",
        }
    }

    /// 交换比较方向后的标记
    pub fn reversed(&self) -> Self {
        match self {
            DiffTag::Unchanged => DiffTag::Unchanged,
            DiffTag::OnlyInEarlier => DiffTag::OnlyInLater,
            DiffTag::OnlyInLater => DiffTag::OnlyInEarlier,
        }
    }
}

/// 带标记的差异行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub tag: DiffTag,
    pub text: String,
}

impl DiffLine {
    pub fn new(tag: DiffTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.tag.marker(), self.text)
    }
}

/// 同一URL在同一查询两次运行之间的差异
///
/// 只引用两条结果，不拥有它们；创建后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    /// 差异唯一标识符
    pub id: Uuid,
    /// 较早结果ID
    pub result1_id: Uuid,
    /// 较晚结果ID
    pub result2_id: Uuid,
    /// 正文逐行差异
    pub content_difference: Vec<DiffLine>,
    /// 标题差异
    pub title_difference: Vec<DiffLine>,
    /// 排名变化（较晚排名 - 较早排名）
    pub ranking_difference: i64,
    /// 正文或标题是否有变化
    pub has_difference: bool,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}
