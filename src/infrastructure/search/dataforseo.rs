// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ProviderSettings;
use crate::domain::models::serp_item::SerpItem;
use crate::domain::search::provider::{ProviderError, RankingProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const LIVE_ORGANIC_PATH: &str = "/v3/serp/google/organic/live/advanced";
const STATUS_OK: i64 = 20000;

/// 单个任务的请求参数
#[derive(Debug, Serialize)]
struct TaskRequest<'a> {
    keyword: &'a str,
    location_code: u32,
    language_code: &'a str,
    device: &'a str,
    os: &'a str,
    depth: u32,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status_code: i64,
    #[serde(default)]
    status_message: String,
    tasks: Option<Vec<ApiTask>>,
}

#[derive(Debug, Deserialize)]
struct ApiTask {
    status_code: i64,
    #[serde(default)]
    status_message: String,
    result: Option<Vec<ApiResult>>,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    items: Option<Vec<SerpItem>>,
}

/// DataForSEO 排名服务客户端
///
/// 调用 Google 自然结果的实时接口，返回排名条目（包含非自然条目）
pub struct DataForSeoProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl DataForSeoProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), LIVE_ORGANIC_PATH)
    }
}

#[async_trait]
impl RankingProvider for DataForSeoProvider {
    async fn fetch_serp(&self, query: &str) -> Result<Vec<SerpItem>, ProviderError> {
        info!("Fetching SERP data for {}", query);

        let payload = [TaskRequest {
            keyword: query,
            location_code: self.settings.location_code,
            language_code: &self.settings.language_code,
            device: &self.settings.device,
            os: &self.settings.os,
            depth: self.settings.depth,
        }];

        let response = self
            .client
            .post(self.endpoint())
            .basic_auth(&self.settings.login, Some(&self.settings.password))
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: ApiResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(ProviderError::Api {
                    status_code: i64::from(status.as_u16()),
                    message: body.chars().take(200).collect(),
                })
            }
            Err(e) => return Err(ProviderError::Malformed(e.to_string())),
        };

        if parsed.status_code != STATUS_OK {
            return Err(ProviderError::Api {
                status_code: parsed.status_code,
                message: parsed.status_message,
            });
        }

        let task = parsed
            .tasks
            .and_then(|tasks| tasks.into_iter().next())
            .ok_or_else(|| ProviderError::Malformed("missing tasks".to_string()))?;
        if task.status_code != STATUS_OK {
            return Err(ProviderError::Api {
                status_code: task.status_code,
                message: task.status_message,
            });
        }

        let items = task
            .result
            .and_then(|results| results.into_iter().next())
            .and_then(|result| result.items)
            .ok_or_else(|| ProviderError::Malformed("missing result items".to_string()))?;

        debug!("{} returned {} items for {}", self.name(), items.len(), query);
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "dataforseo"
    }
}
