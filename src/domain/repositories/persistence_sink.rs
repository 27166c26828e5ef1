// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comment::{CommentRecord, SaveOutcome, WatermarkUpdate};
use crate::domain::models::link::LinkId;
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;

/// 评论持久化特质
///
/// 实现必须保证同一 `(link_id, external_comment_id)` 至多保存一条记录
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// 检查评论是否已保存
    async fn comment_exists(
        &self,
        link_id: LinkId,
        owner_id: i64,
        external_comment_id: &str,
    ) -> Result<bool, RepositoryError>;

    /// 原子地保存评论并更新链接水位线
    ///
    /// 评论已存在时返回 [`SaveOutcome::Duplicate`]，且不更新水位线
    async fn save_comment_and_update_link(
        &self,
        comment: &CommentRecord,
        watermark: &WatermarkUpdate,
    ) -> Result<SaveOutcome, RepositoryError>;
}
