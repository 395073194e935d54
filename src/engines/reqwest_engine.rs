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

use crate::config::settings::FetchSettings;
use crate::engines::traits::{FetchError, RawContent};
use tracing::debug;

/// HTTP 抓取引擎
///
/// 基于reqwest实现的轻量抓取，返回原始 HTML
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建新的HTTP抓取引擎
    ///
    /// # 参数
    ///
    /// * `settings` - 抓取配置（User-Agent 与超时）
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestEngine)` - 引擎实例
    /// * `Err(FetchError)` - HTTP 客户端构建失败
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout())
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    /// 执行HTTP GET
    ///
    /// 不检查状态码，错误页面会在提取阶段因缺少查询词而被拒绝。
    /// 去除空白后为空的响应体返回 `FetchError::EmptyBody`。
    pub async fn fetch(&self, url: &str) -> Result<RawContent, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(RawContent::Markup(body))
    }
}
