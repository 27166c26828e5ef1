// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::link::LinkId;
use crate::domain::repositories::keyword_policy::KeywordPolicy;
use crate::domain::repositories::persistence_sink::PersistenceSink;
use crate::utils::errors::RepositoryError;
use std::sync::Arc;

/// 评论过滤与去重服务
///
/// 关键词列表每次评估时重新读取，不做缓存
#[derive(Clone)]
pub struct CommentFilter {
    keywords: Arc<dyn KeywordPolicy>,
    sink: Arc<dyn PersistenceSink>,
}

impl CommentFilter {
    pub fn new(keywords: Arc<dyn KeywordPolicy>, sink: Arc<dyn PersistenceSink>) -> Self {
        Self { keywords, sink }
    }

    /// 判断评论内容是否可以保存
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 不包含任何屏蔽关键词
    /// * `Ok(false)` - 命中屏蔽关键词
    /// * `Err(RepositoryError)` - 关键词读取失败
    pub async fn is_acceptable(&self, message: &str) -> Result<bool, RepositoryError> {
        let denylist = self.keywords.list_denylist().await?;
        Ok(first_denied_keyword(message, &denylist).is_none())
    }

    /// 判断评论是否已被处理过
    pub async fn is_already_handled(
        &self,
        link_id: LinkId,
        owner_id: i64,
        external_comment_id: &str,
    ) -> Result<bool, RepositoryError> {
        self.sink
            .comment_exists(link_id, owner_id, external_comment_id)
            .await
    }
}

/// 返回消息命中的第一个屏蔽关键词，空白关键词被忽略
pub fn first_denied_keyword<'a>(message: &str, denylist: &'a [String]) -> Option<&'a str> {
    denylist
        .iter()
        .map(String::as_str)
        .filter(|keyword| !keyword.trim().is_empty())
        .find(|keyword| message.contains(*keyword))
}
