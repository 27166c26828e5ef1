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

use crate::gateway::traits::{GatewayError, IdentityResolver};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct ResolveResponse {
    #[serde(default)]
    uid: Option<String>,
}

/// 基于HTTP网关的身份解析器
///
/// `GET {base}/identities/resolve?actor=...`，404表示无法解析
pub struct HttpIdentityResolver {
    client: Client,
    base_url: Url,
}

impl HttpIdentityResolver {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn resolve(&self, raw_id: &str) -> Result<Option<String>, GatewayError> {
        let url = self.base_url.join("identities/resolve")?;
        let response = self
            .client
            .get(url)
            .query(&[("actor", raw_id)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: ResolveResponse = response.error_for_status()?.json().await?;
        Ok(body.uid.filter(|uid| !uid.trim().is_empty()))
    }
}
