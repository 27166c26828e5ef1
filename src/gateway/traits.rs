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

use crate::domain::models::comment::{CommentEvent, CommentRecord};
use crate::domain::models::link::{Link, LinkCategory};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// 网关错误类型
#[derive(Error, Debug)]
pub enum GatewayError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// URL无效
    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// 判断错误是否为暂时性错误
    ///
    /// # 返回值
    ///
    /// 超时、连接失败或服务端错误返回true
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            GatewayError::InvalidUrl(_) => false,
            GatewayError::Other(_) => false,
        }
    }
}

/// 抓取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStrategy {
    /// 公开链接，按主帖子ID抓取
    Primary,
    /// 公开链接，按旧版帖子ID抓取
    Legacy,
    /// 私密链接
    Private,
}

impl FetchStrategy {
    /// 链接类别可用的抓取策略
    pub fn for_category(category: LinkCategory) -> &'static [FetchStrategy] {
        match category {
            LinkCategory::Public => &[FetchStrategy::Primary, FetchStrategy::Legacy],
            LinkCategory::Private => &[FetchStrategy::Private],
        }
    }

    /// 该策略使用的帖子ID，链接没有对应ID时返回None
    pub fn post_id<'a>(&self, link: &'a Link) -> Option<&'a str> {
        match self {
            FetchStrategy::Primary | FetchStrategy::Private => Some(link.post_id.as_str()),
            FetchStrategy::Legacy => link.legacy_post_id.as_deref(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStrategy::Primary => "primary",
            FetchStrategy::Legacy => "legacy",
            FetchStrategy::Private => "private",
        }
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 评论源特质
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// 获取链接的下一条评论
    ///
    /// # 参数
    ///
    /// * `post_id` - 按策略选出的帖子ID
    /// * `strategy` - 抓取策略
    /// * `link` - 链接当前状态
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(CommentEvent))` - 新评论
    /// * `Ok(None)` - 暂无新评论
    /// * `Err(GatewayError)` - 抓取失败
    async fn fetch_next(
        &self,
        post_id: &str,
        strategy: FetchStrategy,
        link: &Link,
    ) -> Result<Option<CommentEvent>, GatewayError>;
}

/// 身份解析特质
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// 将原始评论者ID映射为稳定ID
    async fn resolve(&self, raw_id: &str) -> Result<Option<String>, GatewayError>;
}

/// 评论入库后的下游动作
#[async_trait]
pub trait SideEffectActuator: Send + Sync {
    async fn on_accepted(&self, comment: &CommentRecord, link: &Link) -> Result<(), GatewayError>;
}
