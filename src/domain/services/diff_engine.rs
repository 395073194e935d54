// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::difference::{DiffLine, DiffTag, Difference};
use crate::domain::models::page_result::PageResult;
use chrono::Utc;
use similar::{ChangeTag, TextDiff};
use uuid::Uuid;

/// 差异引擎
///
/// 比较同一链接在两次运行中的结果：逐行正文差异、标题差异、排名变化
pub struct DiffEngine;

impl DiffEngine {
    /// 比较两条结果，`earlier` 来自基线运行
    pub fn compare(earlier: &PageResult, later: &PageResult) -> Difference {
        let earlier_lines: Vec<&str> = earlier.page_content_text.lines().collect();
        let later_lines: Vec<&str> = later.page_content_text.lines().collect();

        Difference {
            id: Uuid::new_v4(),
            result1_id: earlier.id,
            result2_id: later.id,
            content_difference: diff_lines(&earlier_lines, &later_lines),
            title_difference: diff_lines(&[earlier.page_title.as_str()], &[later.page_title.as_str()]),
            ranking_difference: i64::from(later.page_ranking) - i64::from(earlier.page_ranking),
            has_difference: earlier.page_content_text != later.page_content_text
                || earlier.page_title != later.page_title,
            created_at: Utc::now(),
        }
    }
}

fn diff_lines(earlier: &[&str], later: &[&str]) -> Vec<DiffLine> {
    TextDiff::from_slices(earlier, later)
        .iter_all_changes()
        .map(|change| {
            let tag = match change.tag() {
                ChangeTag::Equal => DiffTag::Unchanged,
                ChangeTag::Delete => DiffTag::OnlyInEarlier,
                ChangeTag::Insert => DiffTag::OnlyInLater,
            };
            DiffLine::new(tag, change.value())
        })
        .collect()
}
