// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 基于sea-orm的链接目录、关键词和评论仓库实现
pub mod comment_repo_impl;
pub mod keyword_repo_impl;
pub mod link_directory_impl;
