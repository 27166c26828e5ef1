// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::link::LinkRecord;
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;

/// 链接目录特质
///
/// 活跃链接的权威来源，每个调度周期读取一次
#[async_trait]
pub trait LinkDirectory: Send + Sync {
    /// 获取全部活跃链接的当前快照
    async fn active_links(&self) -> Result<Vec<LinkRecord>, RepositoryError>;
}
