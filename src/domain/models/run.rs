// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 抓取状态
///
/// 同时用于抓取运行（Run）和单条结果的提取状态。
/// 状态转换只有一次：Pending → Success/Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStatus {
    /// 等待中
    #[default]
    Pending,
    /// 成功
    Success,
    /// 失败
    Failed,
}

impl ScrapeStatus {
    /// 是否为终止状态
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScrapeStatus::Success | ScrapeStatus::Failed)
    }
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScrapeStatus::Pending => write!(f, "pending"),
            ScrapeStatus::Success => write!(f, "success"),
            ScrapeStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ScrapeStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ScrapeStatus::Pending),
            "success" => Ok(ScrapeStatus::Success),
            "failed" => Ok(ScrapeStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 非法状态转换
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RunStateError {
    #[error("Run {0} is already {1}")]
    AlreadyFinished(Uuid, ScrapeStatus),
    #[error("Run cannot transition to {0}")]
    NotTerminal(ScrapeStatus),
}

/// 抓取运行实体
///
/// 一次针对某个查询的完整流水线执行。以 Pending 状态创建，
/// 之后恰好转换一次到 Success 或 Failed，同时记录完成时间。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// 运行唯一标识符
    pub id: Uuid,
    /// 所属查询ID
    pub query_id: Uuid,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 完成时间，终止后才有值
    pub completed_at: Option<DateTime<Utc>>,
    /// 运行状态
    pub status: ScrapeStatus,
    /// 失败日志
    pub log: Option<String>,
}

impl Run {
    /// 创建一个处于 Pending 状态的新运行
    pub fn new(query_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            query_id,
            started_at: Utc::now(),
            completed_at: None,
            status: ScrapeStatus::Pending,
            log: None,
        }
    }

    /// 将运行转换到终止状态
    ///
    /// # 参数
    ///
    /// * `status` - 目标状态，必须是 Success 或 Failed
    /// * `log` - 失败日志（成功时通常为 None）
    pub fn finish(&mut self, status: ScrapeStatus, log: Option<String>) -> Result<(), RunStateError> {
        if !status.is_terminal() {
            return Err(RunStateError::NotTerminal(status));
        }
        if self.status.is_terminal() {
            return Err(RunStateError::AlreadyFinished(self.id, self.status));
        }

        self.status = status;
        self.log = log;
        self.completed_at = Some(Utc::now());
        Ok(())
    }
}
