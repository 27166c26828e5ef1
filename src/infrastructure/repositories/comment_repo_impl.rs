// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comment::{CommentRecord, SaveOutcome, WatermarkUpdate};
use crate::domain::models::link::LinkId;
use crate::domain::repositories::persistence_sink::PersistenceSink;
use crate::infrastructure::database::entities::{comment, link};
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::*;
use std::sync::Arc;

/// 评论仓库实现
///
/// 评论写入与水位线更新在同一事务中完成
#[derive(Clone)]
pub struct CommentRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl CommentRepoImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersistenceSink for CommentRepoImpl {
    async fn comment_exists(
        &self,
        link_id: LinkId,
        owner_id: i64,
        external_comment_id: &str,
    ) -> Result<bool, RepositoryError> {
        let count = comment::Entity::find()
            .filter(comment::Column::LinkId.eq(link_id))
            .filter(comment::Column::UserId.eq(owner_id))
            .filter(comment::Column::CmtId.eq(external_comment_id))
            .count(self.db.as_ref())
            .await?;

        Ok(count > 0)
    }

    async fn save_comment_and_update_link(
        &self,
        record: &CommentRecord,
        watermark: &WatermarkUpdate,
    ) -> Result<SaveOutcome, RepositoryError> {
        let txn = self.db.begin().await?;

        let model = comment::ActiveModel {
            id: Set(record.id),
            cmt_id: Set(record.external_comment_id.clone()),
            link_id: Set(record.link_id),
            post_id: Set(record.post_id.clone()),
            user_id: Set(record.owner_id),
            uid: Set(record.uid.clone()),
            message: Set(record.message.clone()),
            phone_number: Set(record.phone_number.clone()),
            name: Set(record.display_name.clone()),
            time_created: Set(record.created_at),
            created_at: Set(Utc::now()),
        };

        // Concurrent pollers may race past the existence check; the unique index decides
        let inserted = comment::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([comment::Column::LinkId, comment::Column::CmtId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        if inserted == 0 {
            txn.rollback().await?;
            return Ok(SaveOutcome::Duplicate);
        }

        link::Entity::update_many()
            .col_expr(
                link::Column::LastCommentTime,
                Expr::value(watermark.last_comment_time),
            )
            .filter(link::Column::Id.eq(watermark.link_id))
            .filter(
                Condition::any()
                    .add(link::Column::LastCommentTime.is_null())
                    .add(link::Column::LastCommentTime.lt(watermark.last_comment_time)),
            )
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(SaveOutcome::Inserted)
    }
}

#[cfg(test)]
#[path = "comment_repo_impl_test.rs"]
mod tests;
