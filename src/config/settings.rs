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

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含数据库、排名服务、页面抓取、浏览器、提取和工作器等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 排名服务配置
    pub provider: ProviderSettings,
    /// HTTP 抓取配置
    pub fetch: FetchSettings,
    /// 浏览器自动化配置
    pub browser: BrowserSettings,
    /// 正文提取配置
    pub extraction: ExtractionSettings,
    /// 工作器配置
    pub worker: WorkerSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 排名服务（DataForSEO）配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    /// API 根地址
    pub base_url: String,
    /// 登录邮箱
    pub login: String,
    /// 密码
    pub password: String,
    /// 地区代码（2826 = 英国）
    pub location_code: u32,
    /// 语言代码
    pub language_code: String,
    /// 设备类型
    pub device: String,
    /// 操作系统
    pub os: String,
    /// 抓取深度（结果条数）
    pub depth: u32,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

/// HTTP 抓取配置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    /// 浏览器 User-Agent
    pub user_agent: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// 浏览器自动化配置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否无头模式
    pub headless: bool,
    /// 导航后等待客户端渲染的时间（毫秒）
    pub settle_delay_ms: u64,
    /// 页面加载超时（秒）
    pub page_load_timeout_secs: u64,
    /// 导航最大尝试次数
    pub max_attempts: u32,
    /// 远程 Chrome 调试地址，设置后不再本地启动浏览器
    pub remote_debugging_url: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            settle_delay_ms: 5000,
            page_load_timeout_secs: 30,
            max_attempts: 3,
            remote_debugging_url: None,
        }
    }
}

/// 正文提取配置
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// 匹配前后保留的字符数
    pub window_chars: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self { window_chars: 300 }
    }
}

/// 工作器配置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    /// 并发工作器数量（每个工作器同一时刻只执行一个运行）
    pub count: usize,
    /// 空闲时轮询间隔（毫秒）
    pub poll_interval_ms: u64,
}

/// 指标导出配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 监听地址
    pub listen_address: String,
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default`、`config/{APP_ENVIRONMENT}` 文件
    /// 和 `SERPDIFF__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("SERPDIFF").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 带默认值的配置构建器
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Default DB pool settings
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default provider settings
            .set_default("provider.base_url", "https://api.dataforseo.com")?
            .set_default("provider.login", "")?
            .set_default("provider.password", "")?
            .set_default("provider.location_code", 2826)?
            .set_default("provider.language_code", "en")?
            .set_default("provider.device", "desktop")?
            .set_default("provider.os", "windows")?
            .set_default("provider.depth", 100)?
            .set_default("provider.timeout_secs", 120)?
            // Default fetch settings
            .set_default("fetch.user_agent", DEFAULT_USER_AGENT)?
            .set_default("fetch.timeout_secs", 30)?
            // Default browser settings
            .set_default("browser.headless", true)?
            .set_default("browser.settle_delay_ms", 5000)?
            .set_default("browser.page_load_timeout_secs", 30)?
            .set_default("browser.max_attempts", 3)?
            // Default extraction settings
            .set_default("extraction.window_chars", 300)?
            // Default worker settings
            .set_default("worker.count", 2)?
            .set_default("worker.poll_interval_ms", 1000)?
            // Default metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_address", "0.0.0.0:9000")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
