// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 排名服务模块
///
/// 提供排名服务接口的具体实现
pub mod dataforseo;

pub use dataforseo::DataForSeoProvider;
