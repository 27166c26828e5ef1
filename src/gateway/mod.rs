// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 外部网关模块
///
/// 定义评论源、身份解析和下游动作的抽象，并提供基于reqwest的实现
pub mod client;
pub mod comment_source;
pub mod identity_resolver;
pub mod side_effect;
pub mod traits;
