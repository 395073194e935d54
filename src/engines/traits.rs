// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engines::browser_engine::BrowserSession;
use crate::engines::site_rules::SiteRule;
use async_trait::async_trait;
use thiserror::Error;

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(reqwest::Error),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 响应内容为空
    #[error("Empty content")]
    EmptyBody,
    /// 浏览器自动化错误
    #[error("Browser error: {0}")]
    Browser(String),
    /// 浏览器导航在所有尝试后仍然失败
    #[error("Page load failed after {attempts} attempts: {reason}")]
    PageLoad { attempts: u32, reason: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::RequestFailed(e)
        }
    }
}

impl FetchError {
    /// 判断错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::RequestFailed(e) => {
                e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            FetchError::Timeout | FetchError::Browser(_) => true,
            FetchError::EmptyBody | FetchError::PageLoad { .. } => false,
        }
    }
}

/// 抓取到的原始内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContent {
    /// 原始 HTML，需要还原成可见文本并按查询截取
    Markup(String),
    /// 浏览器渲染后的可见文本，来自特殊站点
    Rendered { text: String, site: SiteRule },
}

impl RawContent {
    pub fn as_str(&self) -> &str {
        match self {
            RawContent::Markup(html) => html,
            RawContent::Rendered { text, .. } => text,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

/// 抓取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// 直接 HTTP GET 并解析标记
    Http,
    /// 浏览器自动化，按站点规则提取元素
    Browser(SiteRule),
}

impl FetchStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            FetchStrategy::Http => "http",
            FetchStrategy::Browser(_) => "browser",
        }
    }
}

/// 页面抓取器特质
///
/// 浏览器会话由调用方（一次运行）独占持有并通过可变引用传入。
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取页面内容
    async fn fetch(&self, url: &str, session: &mut BrowserSession) -> Result<RawContent, FetchError>;
}
