// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{BrowserSettings, FetchSettings};
use crate::engines::browser_engine::{BrowserEngine, BrowserSession};
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::site_rules::SiteRule;
use crate::engines::traits::{FetchError, FetchStrategy, PageFetcher, RawContent};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info};

/// 抓取策略选择器
///
/// 根据结果链接的主机名在 HTTP 直连与浏览器自动化之间选择
pub struct FetchStrategySelector {
    http: ReqwestEngine,
    browser: BrowserEngine,
}

impl FetchStrategySelector {
    /// 创建新的策略选择器
    pub fn new(fetch: &FetchSettings, browser: &BrowserSettings) -> Result<Self, FetchError> {
        Ok(Self {
            http: ReqwestEngine::new(fetch)?,
            browser: BrowserEngine::new(browser),
        })
    }

    /// 为链接选择抓取策略
    pub fn select(url: &str) -> FetchStrategy {
        match SiteRule::for_url(url) {
            Some(site) => FetchStrategy::Browser(site),
            None => FetchStrategy::Http,
        }
    }
}

#[async_trait]
impl PageFetcher for FetchStrategySelector {
    async fn fetch(&self, url: &str, session: &mut BrowserSession) -> Result<RawContent, FetchError> {
        let strategy = Self::select(url);
        debug!("Fetching {} with {} strategy", url, strategy.name());

        let started = Instant::now();
        let result = match strategy {
            FetchStrategy::Http => self.http.fetch(url).await,
            FetchStrategy::Browser(site) => {
                info!("{} is a {} page, using browser", url, site.name());
                self.browser.fetch(url, site, session).await
            }
        };
        metrics::histogram!("serpdiff_fetch_duration_seconds", "strategy" => strategy.name())
            .record(started.elapsed().as_secs_f64());

        match result {
            Ok(content) if content.is_blank() => Err(FetchError::EmptyBody),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_select_strategy() {
        assert_eq!(
            FetchStrategySelector::select("https://acme.example/widgets"),
            FetchStrategy::Http
        );
        assert_eq!(
            FetchStrategySelector::select("https://www.instagram.com/p/abc"),
            FetchStrategy::Browser(SiteRule::Instagram)
        );
        assert_eq!(
            FetchStrategySelector::select("https://x.com/acme/status/1"),
            FetchStrategy::Browser(SiteRule::Twitter)
        );
        assert_eq!(
            FetchStrategySelector::select("https://notlinkedin.example/"),
            FetchStrategy::Http
        );
    }

    #[tokio::test]
    async fn test_plain_site_fetched_over_http_without_browser() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgets"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<p>acme widgets</p>", "text/html"),
            )
            .mount(&server)
            .await;

        let selector =
            FetchStrategySelector::new(&FetchSettings::default(), &BrowserSettings::default())
                .unwrap();
        let mut session = BrowserSession::new(BrowserSettings::default());

        let content = selector
            .fetch(&format!("{}/widgets", server.uri()), &mut session)
            .await
            .unwrap();

        assert_eq!(content, RawContent::Markup("<p>acme widgets</p>".to_string()));
        assert!(!session.is_active());
    }
}
