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

use crate::config::settings::GatewaySettings;
use crate::gateway::traits::GatewayError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// 构建网关共用的HTTP客户端
pub fn build_client(settings: &GatewaySettings) -> Result<Client, GatewayError> {
    let client = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;
    Ok(client)
}

/// 解析网关基础URL
///
/// 以 `/` 结尾，保证 `join` 时保留基础路径
pub fn base_url(settings: &GatewaySettings) -> Result<Url, GatewayError> {
    let mut raw = settings.base_url.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Ok(Url::parse(&raw)?)
}
