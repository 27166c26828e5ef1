// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义领域层依赖的存储抽象，具体实现由基础设施层提供：
/// - 链接目录（link_directory）：活跃链接的权威来源
/// - 关键词策略（keyword_policy）：屏蔽关键词列表
/// - 评论持久化（persistence_sink）：评论与链接水位线的幂等存储
pub mod keyword_policy;
pub mod link_directory;
pub mod persistence_sink;
