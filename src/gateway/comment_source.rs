// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::comment::CommentEvent;
use crate::domain::models::link::Link;
use crate::gateway::traits::{CommentSource, FetchStrategy, GatewayError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct NextCommentResponse {
    #[serde(default)]
    comment: Option<CommentEvent>,
}

/// 基于HTTP网关的评论源
///
/// `GET {base}/comments/next`，204或空 `comment` 表示暂无新评论
pub struct HttpCommentSource {
    client: Client,
    base_url: Url,
}

impl HttpCommentSource {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl CommentSource for HttpCommentSource {
    async fn fetch_next(
        &self,
        post_id: &str,
        strategy: FetchStrategy,
        link: &Link,
    ) -> Result<Option<CommentEvent>, GatewayError> {
        let url = self.base_url.join("comments/next")?;

        let mut query = vec![
            ("post_id", post_id.to_string()),
            ("strategy", strategy.as_str().to_string()),
            ("link_id", link.id.to_string()),
        ];
        // The private strategy needs both identifiers to locate the thread
        if strategy == FetchStrategy::Private {
            if let Some(legacy) = &link.legacy_post_id {
                query.push(("legacy_post_id", legacy.clone()));
            }
        }

        let response = self.client.get(url).query(&query).send().await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body: NextCommentResponse = response.error_for_status()?.json().await?;
        Ok(body.comment)
    }
}
