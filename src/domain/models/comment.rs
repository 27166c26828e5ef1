// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::link::{LinkId, LiveLink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 评论源返回的候选评论
///
/// 评论源的数据不保证完整，所有字段均可缺失
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentEvent {
    #[serde(default)]
    pub comment_id: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub actor_raw_id: Option<String>,
    #[serde(default)]
    pub actor_resolved_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 通过字段校验的评论
#[derive(Debug, Clone, PartialEq)]
pub struct ValidComment {
    pub comment_id: String,
    pub actor_raw_id: String,
    pub actor_resolved_id: Option<String>,
    pub message: String,
    pub phone_number: Option<String>,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl CommentEvent {
    /// 校验评论ID和评论者ID
    ///
    /// 缺少任一ID的事件视为空轮询；缺少创建时间时以当前时间代替
    pub fn validated(self) -> Option<ValidComment> {
        let comment_id = non_blank(self.comment_id)?;
        let actor_raw_id = non_blank(self.actor_raw_id)?;

        Some(ValidComment {
            comment_id,
            actor_raw_id,
            actor_resolved_id: non_blank(self.actor_resolved_id),
            message: self.message.unwrap_or_default(),
            phone_number: non_blank(self.phone_number),
            display_name: self.display_name.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 持久化的评论记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: Uuid,
    /// 评论源中的评论ID
    pub external_comment_id: String,
    pub link_id: LinkId,
    pub post_id: String,
    pub owner_id: i64,
    /// 解析后的评论者ID
    pub uid: String,
    pub message: String,
    pub phone_number: Option<String>,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl CommentRecord {
    pub fn new(link: &LiveLink, uid: String, comment: ValidComment) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_comment_id: comment.comment_id,
            link_id: link.id(),
            post_id: link.post_id().to_string(),
            owner_id: link.owner_id(),
            uid,
            message: comment.message,
            phone_number: comment.phone_number,
            display_name: comment.display_name,
            created_at: comment.created_at,
        }
    }
}

/// 链接水位线更新
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkUpdate {
    pub link_id: LinkId,
    pub last_comment_time: DateTime<Utc>,
}

impl WatermarkUpdate {
    /// 水位线未设置或评论时间严格晚于水位线时取评论时间，否则保持不变
    pub fn compute(
        link_id: LinkId,
        current: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let last_comment_time = match current {
            Some(current) if created_at <= current => current,
            _ => created_at,
        };
        Self {
            link_id,
            last_comment_time,
        }
    }
}

/// 保存结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// 新记录已写入，水位线已同步
    Inserted,
    /// 同一链接下已存在该评论，未做任何写入
    Duplicate,
}
