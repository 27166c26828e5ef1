// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comment::{CommentRecord, SaveOutcome, WatermarkUpdate};
use crate::domain::models::link::{Link, LinkCategory, LiveLink};
use crate::domain::repositories::persistence_sink::PersistenceSink;
use crate::domain::services::comment_filter::CommentFilter;
use crate::domain::services::identity::resolve_actor_id;
use crate::gateway::traits::{CommentSource, IdentityResolver, SideEffectActuator};
use crate::scheduler::tracked_links::TrackedLinks;
use crate::workers::registry::PollerKey;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// 轮询器依赖的外部协作方
#[derive(Clone)]
pub struct PollerDeps {
    pub source: Arc<dyn CommentSource>,
    pub identity: Arc<dyn IdentityResolver>,
    pub filter: CommentFilter,
    pub sink: Arc<dyn PersistenceSink>,
    pub actuator: Arc<dyn SideEffectActuator>,
}

/// 轮询器停止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 链接已不在跟踪集合中
    Removed,
    /// 链接离开后重新进入，新的激活周期有自己的轮询器
    Reactivated,
    /// 并发数已降到本序号以下
    ThreadCountReduced,
}

/// 单次轮询的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// 没有新评论，或评论缺少必要字段
    Empty,
    FetchFailed,
    /// 命中屏蔽关键词
    Rejected,
    FilterFailed,
    /// 评论已保存过
    AlreadyHandled,
    Persisted,
    PersistFailed,
}

/// 单个链接、单个策略下的一个轮询序号
///
/// 每轮循环开始时检查链接是否仍被跟踪以及序号是否仍在并发数之内，
/// 这是唯一的停止信号。
pub struct Poller {
    key: PollerKey,
    category: LinkCategory,
    activation: u64,
    tracked: Arc<TrackedLinks>,
    deps: PollerDeps,
}

impl Poller {
    pub fn new(
        key: PollerKey,
        category: LinkCategory,
        activation: u64,
        tracked: Arc<TrackedLinks>,
        deps: PollerDeps,
    ) -> Self {
        Self {
            key,
            category,
            activation,
            tracked,
            deps,
        }
    }

    pub fn key(&self) -> PollerKey {
        self.key
    }

    /// 运行轮询循环直到停止
    pub async fn run(self) -> StopReason {
        debug!("Poller {} started", self.key);

        let reason = loop {
            let link = match self.check_membership() {
                Ok(link) => link,
                Err(reason) => break reason,
            };

            let outcome = self.poll_once(&link).await;
            record_outcome(&self.key, outcome);

            self.pace(&link).await;
        };

        debug!("Poller {} stopped: {:?}", self.key, reason);
        reason
    }

    /// 循环开始时的成员与容量检查
    pub fn check_membership(&self) -> Result<Arc<LiveLink>, StopReason> {
        let link = self
            .tracked
            .get(self.category, self.key.link_id)
            .ok_or(StopReason::Removed)?;

        if link.activation() != self.activation {
            return Err(StopReason::Reactivated);
        }
        if link.thread_count() < self.key.ordinal {
            return Err(StopReason::ThreadCountReduced);
        }
        Ok(link)
    }

    /// 执行一次抓取、过滤、保存
    ///
    /// 所有错误都在此处记录并吞掉，不会终止循环
    pub async fn poll_once(&self, link: &Arc<LiveLink>) -> PollOutcome {
        let snapshot = link.snapshot();
        let Some(post_id) = self.key.strategy.post_id(&snapshot) else {
            return PollOutcome::Empty;
        };

        let event = match self
            .deps
            .source
            .fetch_next(post_id, self.key.strategy, &snapshot)
            .await
        {
            Ok(Some(event)) => event,
            Ok(None) => return PollOutcome::Empty,
            Err(e) => {
                warn!(
                    poller = %self.key,
                    transient = e.is_transient(),
                    "Fetch for post {} failed: {}",
                    post_id,
                    e
                );
                return PollOutcome::FetchFailed;
            }
        };
        counter!("comments_fetched_total", "strategy" => self.key.strategy.as_str()).increment(1);

        let Some(comment) = event.validated() else {
            debug!(poller = %self.key, "Comment without comment or actor id, skipping");
            return PollOutcome::Empty;
        };

        match self.deps.filter.is_acceptable(&comment.message).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(poller = %self.key, comment_id = %comment.comment_id, "Comment rejected by keyword filter");
                return PollOutcome::Rejected;
            }
            Err(e) => {
                warn!(poller = %self.key, "Failed to load keyword denylist: {}", e);
                return PollOutcome::FilterFailed;
            }
        }

        match self
            .deps
            .filter
            .is_already_handled(link.id(), link.owner_id(), &comment.comment_id)
            .await
        {
            Ok(false) => {}
            Ok(true) => return PollOutcome::AlreadyHandled,
            Err(e) => {
                error!(poller = %self.key, comment_id = %comment.comment_id, "Failed to check existing comment: {}", e);
                return PollOutcome::PersistFailed;
            }
        }

        // A stable id supplied by the source skips the resolver
        let uid = match comment.actor_resolved_id.clone() {
            Some(resolved) => resolved,
            None => resolve_actor_id(self.deps.identity.as_ref(), &comment.actor_raw_id).await,
        };
        let record = CommentRecord::new(link, uid, comment);
        let watermark =
            WatermarkUpdate::compute(link.id(), link.last_comment_time(), record.created_at);

        match self
            .deps
            .sink
            .save_comment_and_update_link(&record, &watermark)
            .await
        {
            Ok(SaveOutcome::Inserted) => {
                link.advance_watermark(watermark.last_comment_time);
                info!(poller = %self.key, comment_id = %record.external_comment_id, "Comment saved");
                if link.category() == LinkCategory::Public {
                    self.fire_side_effect(record, snapshot);
                }
                PollOutcome::Persisted
            }
            Ok(SaveOutcome::Duplicate) => PollOutcome::AlreadyHandled,
            Err(e) => {
                // No replay queue: the event is dropped
                error!(
                    poller = %self.key,
                    comment_id = %record.external_comment_id,
                    "Failed to persist comment, dropping it: {}",
                    e
                );
                PollOutcome::PersistFailed
            }
        }
    }

    fn fire_side_effect(&self, record: CommentRecord, link: Link) {
        let actuator = Arc::clone(&self.deps.actuator);
        let key = self.key;
        tokio::spawn(async move {
            if let Err(e) = actuator.on_accepted(&record, &link).await {
                counter!("side_effect_failures_total").increment(1);
                warn!(
                    poller = %key,
                    comment_id = %record.external_comment_id,
                    "Side effect for comment failed: {}",
                    e
                );
            }
        });
    }

    /// 按链接当前的间隔休眠；间隔为0时让出执行权
    async fn pace(&self, link: &LiveLink) {
        match link.delay_seconds() {
            0 => tokio::task::yield_now().await,
            delay => sleep(Duration::from_secs(delay)).await,
        }
    }
}

fn record_outcome(key: &PollerKey, outcome: PollOutcome) {
    let strategy = key.strategy.as_str();
    match outcome {
        PollOutcome::Persisted => {
            counter!("comments_accepted_total", "strategy" => strategy).increment(1)
        }
        PollOutcome::Rejected => {
            counter!("comments_rejected_total", "reason" => "keyword").increment(1)
        }
        PollOutcome::AlreadyHandled => {
            counter!("comments_rejected_total", "reason" => "duplicate").increment(1)
        }
        PollOutcome::FetchFailed => {
            counter!("comment_fetch_errors_total", "strategy" => strategy).increment(1)
        }
        PollOutcome::PersistFailed => counter!("comment_persist_errors_total").increment(1),
        PollOutcome::FilterFailed | PollOutcome::Empty => {}
    }
}

#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;
