// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 查询（query）：被跟踪的搜索短语
/// - 运行（run）：一次针对查询的抓取执行
/// - 结果（page_result）：运行中捕获的单个排名页面
/// - 差异（difference）：同一URL在两次运行之间的比较
/// - 排名条目（serp_item）：排名服务返回的原始条目
pub mod difference;
pub mod page_result;
pub mod query;
pub mod run;
pub mod serp_item;
