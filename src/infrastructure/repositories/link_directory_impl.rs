// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::link::LinkRecord;
use crate::domain::repositories::link_directory::LinkDirectory;
use crate::infrastructure::database::entities::link::{self, LINK_STATUS_STARTED};
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;

/// 链接目录实现
///
/// 状态为 `started` 的链接即为活跃链接
#[derive(Clone)]
pub struct LinkDirectoryImpl {
    db: Arc<DatabaseConnection>,
}

impl LinkDirectoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LinkDirectory for LinkDirectoryImpl {
    async fn active_links(&self) -> Result<Vec<LinkRecord>, RepositoryError> {
        let models = link::Entity::find()
            .filter(link::Column::Status.eq(LINK_STATUS_STARTED))
            .order_by_asc(link::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

impl From<link::Model> for LinkRecord {
    fn from(model: link::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            post_id: model.post_id,
            legacy_post_id: model.post_id_v1,
            category: model.link_type,
            thread_count: model.thread,
            delay_seconds: model.delay_time,
            last_comment_time: model.last_comment_time,
        }
    }
}
