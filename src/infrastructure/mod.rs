// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含的子模块：
/// - 数据库（database）：连接池和实体映射
/// - 指标（metrics）：Prometheus 导出器
/// - 仓库实现（repositories）：领域仓库接口的SeaORM实现
/// - 排名服务（search）：DataForSEO 客户端
///
/// 基础设施层依赖于领域层的抽象接口，领域层不感知具体实现。
pub mod database;
pub mod metrics;
pub mod repositories;
pub mod search;
