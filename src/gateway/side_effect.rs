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

use crate::domain::models::comment::CommentRecord;
use crate::domain::models::link::Link;
use crate::gateway::traits::{GatewayError, SideEffectActuator};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

/// 评论隐藏动作
///
/// 公开链接的评论入库后请求网关隐藏该评论
pub struct HttpHideCommentActuator {
    client: Client,
    base_url: Url,
}

impl HttpHideCommentActuator {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl SideEffectActuator for HttpHideCommentActuator {
    async fn on_accepted(&self, comment: &CommentRecord, link: &Link) -> Result<(), GatewayError> {
        let url = self.base_url.join("comments/hide")?;
        let payload = json!({
            "link_id": link.id,
            "post_id": link.post_id,
            "owner_id": link.owner_id,
            "comment_id": comment.external_comment_id,
            "uid": comment.uid,
        });

        self.client
            .post(url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
