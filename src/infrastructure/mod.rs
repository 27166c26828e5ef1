// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供领域抽象的具体实现：
/// - 数据库（database）：连接池、迁移和实体映射
/// - 指标（metrics）：Prometheus导出
/// - 仓库实现（repositories）：链接目录、关键词、评论的sea-orm实现
pub mod database;
pub mod metrics;
pub mod repositories;
