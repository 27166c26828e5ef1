// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 链接（link）：被监控的帖子及其在跟踪集合中的共享状态
/// - 评论（comment）：候选评论、持久化记录与水位线更新
pub mod comment;
pub mod link;
