// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 包括遥测初始化和浏览器导航的重试策略
pub mod retry_policy;
pub mod telemetry;
