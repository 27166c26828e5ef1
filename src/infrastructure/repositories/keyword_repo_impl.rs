// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::keyword_policy::KeywordPolicy;
use crate::infrastructure::database::entities::keyword;
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;

/// 关键词仓库实现
#[derive(Clone)]
pub struct KeywordRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl KeywordRepoImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KeywordPolicy for KeywordRepoImpl {
    async fn list_denylist(&self) -> Result<Vec<String>, RepositoryError> {
        let keywords = keyword::Entity::find()
            .order_by_asc(keyword::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(keywords.into_iter().map(|k| k.keyword).collect())
    }
}
