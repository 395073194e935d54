// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// 使用SeaORM框架进行对象关系映射，表结构由 migration crate 创建
pub mod difference;
pub mod page_result;
pub mod query;
pub mod scrape;
