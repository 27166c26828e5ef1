// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::DomainError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU64, Ordering};
use validator::Validate;

pub type LinkId = i64;

/// 链接类别
///
/// 决定轮询器可用的抓取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    /// 公开帖子，支持主ID与旧版ID两种抓取策略
    Public,
    /// 私密帖子，仅支持一种抓取策略
    Private,
}

impl LinkCategory {
    pub const ALL: [LinkCategory; 2] = [LinkCategory::Public, LinkCategory::Private];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkCategory::Public => "public",
            LinkCategory::Private => "private",
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(LinkCategory::Public),
            "private" => Ok(LinkCategory::Private),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}

/// 被监控的帖子
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub category: LinkCategory,
    /// 主帖子ID
    pub post_id: String,
    /// 旧版帖子ID，存在时公开链接额外启用旧版抓取策略
    pub legacy_post_id: Option<String>,
    /// 期望的并发轮询器数量
    pub thread_count: u32,
    /// 两次轮询之间的间隔（秒）
    pub delay_seconds: u64,
    /// 已知最新评论时间（水位线）
    pub last_comment_time: Option<DateTime<Utc>>,
    pub owner_id: i64,
}

/// 链接目录中的原始记录
///
/// 目录数据可能不合法，转换为 [`Link`] 时逐条校验
#[derive(Debug, Clone, Validate)]
pub struct LinkRecord {
    pub id: LinkId,
    pub owner_id: i64,
    #[validate(length(min = 1, message = "post id cannot be empty"))]
    pub post_id: String,
    pub legacy_post_id: Option<String>,
    pub category: String,
    #[validate(range(min = 0, message = "thread count cannot be negative"))]
    pub thread_count: i32,
    #[validate(range(min = 0, message = "delay cannot be negative"))]
    pub delay_seconds: i32,
    pub last_comment_time: Option<DateTime<Utc>>,
}

impl TryFrom<LinkRecord> for Link {
    type Error = DomainError;

    fn try_from(record: LinkRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        record.validate().map_err(|e| DomainError::InvalidLink {
            id,
            reason: e.to_string(),
        })?;

        let category = record
            .category
            .parse::<LinkCategory>()
            .map_err(|e| DomainError::InvalidLink {
                id,
                reason: e.to_string(),
            })?;

        Ok(Link {
            id,
            category,
            post_id: record.post_id.trim().to_string(),
            legacy_post_id: record
                .legacy_post_id
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            thread_count: record.thread_count as u32,
            delay_seconds: record.delay_seconds as u64,
            last_comment_time: record.last_comment_time,
            owner_id: record.owner_id,
        })
    }
}

const WATERMARK_UNSET: i64 = i64::MIN;

/// 跟踪集合中共享的链接记录
///
/// 不可变字段在激活时确定；并发数、间隔和水位线由调度器与轮询器并发更新，
/// 因此以原子量保存。`activation` 标识一次激活周期，链接离开后再次进入会得到新值。
#[derive(Debug)]
pub struct LiveLink {
    id: LinkId,
    category: LinkCategory,
    post_id: String,
    legacy_post_id: Option<String>,
    owner_id: i64,
    activation: u64,
    thread_count: AtomicU32,
    delay_seconds: AtomicU64,
    /// 毫秒时间戳，`WATERMARK_UNSET` 表示尚无评论
    last_comment_time: AtomicI64,
}

impl LiveLink {
    pub fn new(link: Link, activation: u64) -> Self {
        Self {
            id: link.id,
            category: link.category,
            post_id: link.post_id,
            legacy_post_id: link.legacy_post_id,
            owner_id: link.owner_id,
            activation,
            thread_count: AtomicU32::new(link.thread_count),
            delay_seconds: AtomicU64::new(link.delay_seconds),
            last_comment_time: AtomicI64::new(
                link.last_comment_time
                    .map(|t| t.timestamp_millis())
                    .unwrap_or(WATERMARK_UNSET),
            ),
        }
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn category(&self) -> LinkCategory {
        self.category
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn legacy_post_id(&self) -> Option<&str> {
        self.legacy_post_id.as_deref()
    }

    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    pub fn activation(&self) -> u64 {
        self.activation
    }

    pub fn thread_count(&self) -> u32 {
        self.thread_count.load(Ordering::Acquire)
    }

    pub fn delay_seconds(&self) -> u64 {
        self.delay_seconds.load(Ordering::Acquire)
    }

    pub fn last_comment_time(&self) -> Option<DateTime<Utc>> {
        match self.last_comment_time.load(Ordering::Acquire) {
            WATERMARK_UNSET => None,
            millis => Utc.timestamp_millis_opt(millis).single(),
        }
    }

    /// 应用目录中刷新后的配置
    ///
    /// 并发数与间隔直接覆盖，水位线只前移
    pub fn apply_config(&self, link: &Link) {
        self.thread_count.store(link.thread_count, Ordering::Release);
        self.delay_seconds.store(link.delay_seconds, Ordering::Release);
        if let Some(at) = link.last_comment_time {
            self.advance_watermark(at);
        }
    }

    /// 以取最大值的方式推进水位线，返回水位线是否发生变化
    pub fn advance_watermark(&self, at: DateTime<Utc>) -> bool {
        let millis = at.timestamp_millis();
        self.last_comment_time.fetch_max(millis, Ordering::AcqRel) < millis
    }

    /// 当前状态的值拷贝
    pub fn snapshot(&self) -> Link {
        Link {
            id: self.id,
            category: self.category,
            post_id: self.post_id.clone(),
            legacy_post_id: self.legacy_post_id.clone(),
            thread_count: self.thread_count(),
            delay_seconds: self.delay_seconds(),
            last_comment_time: self.last_comment_time(),
            owner_id: self.owner_id,
        }
    }
}
