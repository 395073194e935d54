// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 内容提取（content_extractor）：HTML 还原为可见文本，按查询截取片段
/// - 差异引擎（diff_engine）：同一链接两次结果的逐行比较
/// - 关联器（correlator）：两次运行之间排名链接集合的变化
/// - 运行编排（run_orchestrator）：驱动一次完整的抓取运行
pub mod content_extractor;
pub mod correlator;
pub mod diff_engine;
pub mod run_orchestrator;
