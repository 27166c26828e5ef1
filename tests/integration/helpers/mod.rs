// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use commentwatch::domain::models::comment::{
    CommentEvent, CommentRecord, SaveOutcome, WatermarkUpdate,
};
use commentwatch::domain::models::link::{Link, LinkId, LinkRecord};
use commentwatch::domain::repositories::keyword_policy::KeywordPolicy;
use commentwatch::domain::repositories::link_directory::LinkDirectory;
use commentwatch::domain::repositories::persistence_sink::PersistenceSink;
use commentwatch::domain::services::comment_filter::CommentFilter;
use commentwatch::gateway::traits::{
    CommentSource, FetchStrategy, GatewayError, IdentityResolver, SideEffectActuator,
};
use commentwatch::scheduler::monitor_scheduler::MonitorScheduler;
use commentwatch::utils::errors::RepositoryError;
use commentwatch::workers::poller::PollerDeps;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 可在测试中随时替换内容的链接目录
#[derive(Default)]
pub struct StaticDirectory {
    records: Mutex<Vec<LinkRecord>>,
    fail: AtomicBool,
}

impl StaticDirectory {
    pub fn set(&self, records: Vec<LinkRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl LinkDirectory for StaticDirectory {
    async fn active_links(&self) -> Result<Vec<LinkRecord>, RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RepositoryError::Internal("directory offline".to_string()));
        }
        Ok(self.records.lock().unwrap().clone())
    }
}

/// 按（链接, 策略）排队返回评论的评论源，同一队列被该策略的所有序号共享
#[derive(Default)]
pub struct ScriptedSource {
    queues: Mutex<HashMap<(LinkId, FetchStrategy), VecDeque<CommentEvent>>>,
    failures_left: AtomicUsize,
    fetches: AtomicUsize,
    post_ids: Mutex<HashSet<(FetchStrategy, String)>>,
}

impl ScriptedSource {
    pub fn push(&self, link_id: LinkId, strategy: FetchStrategy, event: CommentEvent) {
        self.queues
            .lock()
            .unwrap()
            .entry((link_id, strategy))
            .or_default()
            .push_back(event);
    }

    pub fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn saw_post_id(&self, strategy: FetchStrategy, post_id: &str) -> bool {
        self.post_ids
            .lock()
            .unwrap()
            .contains(&(strategy, post_id.to_string()))
    }
}

#[async_trait]
impl CommentSource for ScriptedSource {
    async fn fetch_next(
        &self,
        post_id: &str,
        strategy: FetchStrategy,
        link: &Link,
    ) -> Result<Option<CommentEvent>, GatewayError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.post_ids
            .lock()
            .unwrap()
            .insert((strategy, post_id.to_string()));

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(GatewayError::Other("source unavailable".to_string()));
        }

        Ok(self
            .queues
            .lock()
            .unwrap()
            .get_mut(&(link.id, strategy))
            .and_then(|queue| queue.pop_front()))
    }
}

pub struct PassthroughResolver;

#[async_trait]
impl IdentityResolver for PassthroughResolver {
    async fn resolve(&self, raw_actor_id: &str) -> Result<Option<String>, GatewayError> {
        Ok(Some(format!("uid-{}", raw_actor_id)))
    }
}

pub struct StaticKeywords(pub Vec<String>);

#[async_trait]
impl KeywordPolicy for StaticKeywords {
    async fn list_denylist(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.0.clone())
    }
}

/// 内存持久化，按（链接, 评论ID）保证唯一
#[derive(Default)]
pub struct MemorySink {
    saved: Mutex<Vec<CommentRecord>>,
    keys: Mutex<HashSet<(LinkId, String)>>,
    watermarks: Mutex<HashMap<LinkId, DateTime<Utc>>>,
    fail: AtomicBool,
}

impl MemorySink {
    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            ..Default::default()
        }
    }

    pub fn saved_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .saved
            .lock()
            .unwrap()
            .iter()
            .map(|record| record.external_comment_id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn watermark(&self, link_id: LinkId) -> Option<DateTime<Utc>> {
        self.watermarks.lock().unwrap().get(&link_id).copied()
    }
}

#[async_trait]
impl PersistenceSink for MemorySink {
    async fn comment_exists(
        &self,
        link_id: LinkId,
        _owner_id: i64,
        external_comment_id: &str,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .keys
            .lock()
            .unwrap()
            .contains(&(link_id, external_comment_id.to_string())))
    }

    async fn save_comment_and_update_link(
        &self,
        comment: &CommentRecord,
        watermark: &WatermarkUpdate,
    ) -> Result<SaveOutcome, RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RepositoryError::Internal("write rejected".to_string()));
        }
        if !self
            .keys
            .lock()
            .unwrap()
            .insert((comment.link_id, comment.external_comment_id.clone()))
        {
            return Ok(SaveOutcome::Duplicate);
        }

        self.saved.lock().unwrap().push(comment.clone());
        let mut watermarks = self.watermarks.lock().unwrap();
        let entry = watermarks
            .entry(watermark.link_id)
            .or_insert(watermark.last_comment_time);
        if watermark.last_comment_time > *entry {
            *entry = watermark.last_comment_time;
        }
        Ok(SaveOutcome::Inserted)
    }
}

#[derive(Default)]
pub struct RecordingActuator {
    calls: Mutex<Vec<String>>,
}

impl RecordingActuator {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SideEffectActuator for RecordingActuator {
    async fn on_accepted(&self, comment: &CommentRecord, _link: &Link) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push(comment.external_comment_id.clone());
        Ok(())
    }
}

/// 组装好的调度器与全部测试替身
pub struct TestMonitor {
    pub scheduler: Arc<MonitorScheduler>,
    pub directory: Arc<StaticDirectory>,
    pub source: Arc<ScriptedSource>,
    pub sink: Arc<MemorySink>,
    pub actuator: Arc<RecordingActuator>,
}

pub fn create_test_monitor(denylist: &[&str]) -> TestMonitor {
    create_test_monitor_with_sink(denylist, MemorySink::default())
}

pub fn create_test_monitor_with_sink(denylist: &[&str], sink: MemorySink) -> TestMonitor {
    let directory = Arc::new(StaticDirectory::default());
    let source = Arc::new(ScriptedSource::default());
    let sink = Arc::new(sink);
    let actuator = Arc::new(RecordingActuator::default());
    let keywords = Arc::new(StaticKeywords(
        denylist.iter().map(|k| k.to_string()).collect(),
    ));

    let deps = PollerDeps {
        source: source.clone(),
        identity: Arc::new(PassthroughResolver),
        filter: CommentFilter::new(keywords, sink.clone()),
        sink: sink.clone(),
        actuator: actuator.clone(),
    };
    let scheduler = Arc::new(MonitorScheduler::new(
        directory.clone(),
        deps,
        Duration::from_secs(5),
    ));

    TestMonitor {
        scheduler,
        directory,
        source,
        sink,
        actuator,
    }
}

pub fn link_record(id: LinkId, category: &str, thread_count: i32, delay_seconds: i32) -> LinkRecord {
    LinkRecord {
        id,
        owner_id: 9,
        post_id: format!("post-{}", id),
        legacy_post_id: None,
        category: category.to_string(),
        thread_count,
        delay_seconds,
        last_comment_time: None,
    }
}

pub fn comment_event(id: &str, message: &str, created_at: DateTime<Utc>) -> CommentEvent {
    CommentEvent {
        comment_id: Some(id.to_string()),
        actor_raw_id: Some("5001".to_string()),
        message: Some(message.to_string()),
        display_name: Some("tester".to_string()),
        created_at: Some(created_at),
        ..Default::default()
    }
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - ChronoDuration::minutes(minutes)
}
