// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// - 领域模型（models）：链接与评论
/// - 仓库接口（repositories）：链接目录、关键词策略、评论持久化
/// - 服务（services）：评论过滤去重与评论者身份解析
pub mod models;
pub mod repositories;
pub mod services;
