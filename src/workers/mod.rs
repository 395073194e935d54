// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 作为外部任务队列的适配层：从存储中认领待执行的运行并交给编排器
pub mod manager;
pub mod run_worker;
pub mod worker;

pub use worker::Worker;
