// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 集成测试
///
/// 针对内存 SQLite 运行真实迁移，覆盖仓库实现、关联器和完整流水线
pub mod correlator_test;
pub mod helpers;
pub mod pipeline_test;
pub mod repositories;
