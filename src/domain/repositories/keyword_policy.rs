// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::RepositoryError;
use async_trait::async_trait;

/// 关键词策略特质
#[async_trait]
pub trait KeywordPolicy: Send + Sync {
    /// 获取当前的屏蔽关键词列表
    async fn list_denylist(&self) -> Result<Vec<String>, RepositoryError>;
}
