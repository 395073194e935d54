// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::site_rules::{ElementTarget, SiteRule, FALLBACK_SELECTOR};
use crate::engines::traits::{FetchError, RawContent};
use crate::utils::retry_policy::RetryPolicy;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 已启动的浏览器及其 CDP 事件处理任务
struct LiveBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
    remote: bool,
}

/// 浏览器会话
///
/// 由一次运行独占持有，首次使用时才启动浏览器。每次特殊站点抓取结束后
/// 都会调用 `release`；运行结束前编排器会再次调用以确保没有遗留进程。
pub struct BrowserSession {
    settings: BrowserSettings,
    live: Option<LiveBrowser>,
}

impl BrowserSession {
    pub fn new(settings: BrowserSettings) -> Self {
        Self {
            settings,
            live: None,
        }
    }

    /// 是否持有已启动的浏览器
    pub fn is_active(&self) -> bool {
        self.live.is_some()
    }

    async fn acquire(&mut self) -> Result<&Browser, FetchError> {
        if self.live.is_none() {
            self.live = Some(Self::launch(&self.settings).await?);
        }
        match self.live.as_ref() {
            Some(live) => Ok(&live.browser),
            None => Err(FetchError::Browser("browser session unavailable".to_string())),
        }
    }

    async fn launch(settings: &BrowserSettings) -> Result<LiveBrowser, FetchError> {
        let (browser, mut handler, remote) = if let Some(url) = &settings.remote_debugging_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            let (browser, handler) = Browser::connect(url).await.map_err(|e| {
                FetchError::Browser(format!("Failed to connect to remote Chrome: {}", e))
            })?;
            (browser, handler, true)
        } else {
            let mut builder = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(Duration::from_secs(settings.page_load_timeout_secs))
                .arg("--start-maximized")
                .arg("--disable-dev-shm-usage");
            if !settings.headless {
                builder = builder.with_head();
            }
            let config = builder.build().map_err(FetchError::Browser)?;
            let (browser, handler) = Browser::launch(config)
                .await
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            (browser, handler, false)
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("Browser session started");
        Ok(LiveBrowser {
            browser,
            handler,
            remote,
        })
    }

    /// 关闭浏览器并回收进程；未启动时为空操作
    pub async fn release(&mut self) {
        let Some(mut live) = self.live.take() else {
            return;
        };

        if !live.remote {
            if let Err(e) = live.browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            if let Err(e) = live.browser.wait().await {
                warn!("Failed to wait for browser process: {}", e);
            }
        }
        live.handler.abort();
        debug!("Browser session released");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Browser 自身的 Drop 会结束子进程，这里只需停止事件循环
        if let Some(live) = self.live.take() {
            live.handler.abort();
        }
    }
}

/// 浏览器抓取引擎
///
/// 基于chromiumoxide实现：导航、等待客户端渲染、按站点规则提取可见文本
pub struct BrowserEngine {
    settle_delay: Duration,
    navigation_timeout: Duration,
    retry_policy: RetryPolicy,
}

impl BrowserEngine {
    pub fn new(settings: &BrowserSettings) -> Self {
        Self {
            settle_delay: Duration::from_millis(settings.settle_delay_ms),
            navigation_timeout: Duration::from_secs(settings.page_load_timeout_secs),
            retry_policy: RetryPolicy::navigation(settings.max_attempts),
        }
    }

    /// 抓取特殊站点页面
    ///
    /// 导航失败时销毁并重建会话后重试，尝试耗尽返回 `FetchError::PageLoad`。
    /// 无论成功与否，返回前都会释放会话。
    pub async fn fetch(
        &self,
        url: &str,
        site: SiteRule,
        session: &mut BrowserSession,
    ) -> Result<RawContent, FetchError> {
        let outcome = self.fetch_with_retries(url, site, session).await;
        session.release().await;
        outcome
    }

    async fn fetch_with_retries(
        &self,
        url: &str,
        site: SiteRule,
        session: &mut BrowserSession,
    ) -> Result<RawContent, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.navigate(url, session).await {
                Ok(page) => {
                    tokio::time::sleep(self.settle_delay).await;
                    let text = extract_rendered_text(&page, site).await;
                    if let Err(e) = page.close().await {
                        debug!("Failed to close page for {}: {}", url, e);
                    }
                    return text.map(|text| RawContent::Rendered { text, site });
                }
                Err(e) => {
                    warn!(
                        "Navigation to {} failed (attempt {}/{}): {}",
                        url, attempt, self.retry_policy.max_attempts, e
                    );
                    session.release().await;

                    if !self.retry_policy.should_retry_with_error(attempt, &e) {
                        return Err(FetchError::PageLoad {
                            attempts: attempt,
                            reason: e.to_string(),
                        });
                    }
                    tokio::time::sleep(self.retry_policy.calculate_backoff(attempt)).await;
                }
            }
        }
    }

    async fn navigate(&self, url: &str, session: &mut BrowserSession) -> Result<Page, FetchError> {
        let browser = session.acquire().await?;

        tokio::time::timeout(self.navigation_timeout, async {
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            if let Err(e) = page.goto(url).await {
                page.close().await.ok();
                return Err(FetchError::Browser(e.to_string()));
            }
            Ok(page)
        })
        .await
        .map_err(|_| FetchError::Timeout)?
    }
}

/// 按站点规则提取可见文本，目标结构缺失时回退到整页文本
async fn extract_rendered_text(page: &Page, site: SiteRule) -> Result<String, FetchError> {
    match extract_target(page, site.target()).await {
        Ok(text) if !text.trim().is_empty() => return Ok(text),
        Ok(_) => debug!("{} target was empty, using page body", site.name()),
        Err(e) => debug!("{} target not found ({}), using page body", site.name(), e),
    }

    element_text(page, FALLBACK_SELECTOR)
        .await
        .map_err(|e| FetchError::Browser(e.to_string()))
}

async fn extract_target(page: &Page, target: ElementTarget) -> Result<String, chromiumoxide::error::CdpError> {
    match target {
        ElementTarget::Children {
            container,
            skip,
            take,
        } => {
            let children = page
                .find_element(container)
                .await?
                .find_elements(":scope > *")
                .await?;
            let mut texts = Vec::with_capacity(take);
            for child in children.iter().skip(skip).take(take) {
                texts.push(child.inner_text().await?.unwrap_or_default());
            }
            Ok(texts.join("\n"))
        }
        ElementTarget::Single(selector) => element_text(page, selector).await,
        ElementTarget::HeadlineAndBody { headline, body } => {
            let headline = element_text(page, headline).await?;
            let body = element_text(page, body).await?;
            Ok(format!("{}\n\n{}", headline.trim(), body.trim()))
        }
    }
}

async fn element_text(page: &Page, selector: &str) -> Result<String, chromiumoxide::error::CdpError> {
    Ok(page
        .find_element(selector)
        .await?
        .inner_text()
        .await?
        .unwrap_or_default())
}
