// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 查询仓库（query_repository）
/// - 运行仓库（run_repository）：包含基线查找和待执行运行的认领
/// - 结果仓库（result_repository）：按运行和URL匹配结果
/// - 差异仓库（difference_repository）
pub mod difference_repository;
pub mod errors;
pub mod query_repository;
pub mod result_repository;
pub mod run_repository;

pub use errors::RepositoryError;
