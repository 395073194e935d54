// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::RawContent;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use scraper::{Html, Node};
use thiserror::Error;

/// 不属于可见文本的元素
const INVISIBLE_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// 窗口之间的间隔标记
const GAP_MARKER: &str = "...\n\n";

/// 截断标记
const TRAILING_MARKER: &str = "...";

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// 内容提取错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Empty content.")]
    EmptyContent,
    #[error("Query not in returned content.")]
    QueryNotPresent,
}

/// 内容提取器
///
/// 把抓取到的页面还原为可见文本，并截取与查询相关的片段。
/// 特殊站点的渲染文本已经按元素截取过，不再开窗。
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    window_chars: usize,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(300)
    }
}

impl ContentExtractor {
    pub fn new(window_chars: usize) -> Self {
        Self { window_chars }
    }

    /// 提取与查询相关的文本
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 清理后的文本片段，必然包含查询（忽略大小写）
    /// * `Err(ExtractionError)` - 内容为空或不包含查询
    pub fn extract(&self, raw: &RawContent, query: &str) -> Result<String, ExtractionError> {
        let (text, windowed) = match raw {
            RawContent::Markup(html) => (html_to_text(html), true),
            RawContent::Rendered { text, .. } => (text.clone(), false),
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::EmptyContent);
        }
        ensure_query_present(text, query)?;

        let excerpt = if windowed {
            let excerpt = self.search_text(text, query);
            ensure_query_present(&excerpt, query)?;
            excerpt
        } else {
            text.to_string()
        };

        Ok(BLANK_LINES.replace_all(&excerpt, "\n\n").into_owned())
    }

    /// 以查询中的每个词为中心截取前后窗口
    ///
    /// 重叠或相邻的窗口直接合并；不相邻的窗口之间插入 `"...\n\n"`；
    /// 最后一个窗口没有到达文本末尾时追加 `"..."`。没有任何匹配时返回空串。
    pub fn search_text(&self, text: &str, query: &str) -> String {
        let Some(pattern) = word_pattern(query) else {
            return String::new();
        };

        let mut sections = String::new();
        let mut last_end = 0;
        let mut matched = false;

        for m in pattern.find_iter(text) {
            matched = true;
            let start = chars_before(text, m.start(), self.window_chars).max(last_end);
            if start != last_end {
                sections.push_str(GAP_MARKER);
            }
            let end = chars_after(text, m.end(), self.window_chars).max(start);
            sections.push_str(&text[start..end]);
            last_end = end;
        }

        if !matched {
            return String::new();
        }
        if last_end != text.len() {
            sections.push_str(TRAILING_MARKER);
        }
        sections
    }
}

/// 查询词的单词边界匹配，忽略大小写
fn word_pattern(query: &str) -> Option<Regex> {
    let words: Vec<String> = query
        .split_whitespace()
        .map(|w| regex::escape(&w.to_lowercase()))
        .collect();
    if words.is_empty() {
        return None;
    }

    RegexBuilder::new(&format!(r"\b({})\b", words.join("|")))
        .case_insensitive(true)
        .build()
        .ok()
}

fn ensure_query_present(text: &str, query: &str) -> Result<(), ExtractionError> {
    if text.to_lowercase().contains(&query.trim().to_lowercase()) {
        Ok(())
    } else {
        Err(ExtractionError::QueryNotPresent)
    }
}

/// `pos` 之前至多 `window` 个字符的起始字节偏移
fn chars_before(text: &str, pos: usize, window: usize) -> usize {
    if window == 0 {
        return pos;
    }
    text[..pos]
        .char_indices()
        .rev()
        .nth(window - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// `pos` 之后至多 `window` 个字符的结束字节偏移
fn chars_after(text: &str, pos: usize, window: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(window)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// 把 HTML 还原为可见文本
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|e| e.name()))
            .is_some_and(|name| INVISIBLE_ELEMENTS.contains(&name));
        if !hidden {
            text.push_str(fragment);
        }
    }

    text
}

#[cfg(test)]
#[path = "content_extractor_test.rs"]
mod tests;
