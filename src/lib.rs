// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、服务和仓库接口
pub mod domain;

/// 引擎模块
///
/// HTTP 与浏览器两种页面抓取方式以及策略选择
pub mod engines;

/// 基础设施模块
///
/// 数据库、排名服务和指标导出
pub mod infrastructure;

/// 工具模块
pub mod utils;

/// 工作器模块
///
/// 认领并执行待执行的运行
pub mod workers;
