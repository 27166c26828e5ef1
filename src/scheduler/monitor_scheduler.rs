// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::link::{Link, LinkCategory};
use crate::domain::repositories::link_directory::LinkDirectory;
use crate::scheduler::tracked_links::TrackedLinks;
use crate::utils::errors::SchedulerError;
use crate::workers::poller::PollerDeps;
use crate::workers::registry::PollerRegistry;
use crate::workers::spawner::WorkerPoolSpawner;
use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// 单次调度的统计结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub tracked_public: usize,
    pub tracked_private: usize,
    /// 本次新激活的链接数
    pub activated: usize,
    pub spawned_pollers: usize,
    /// 被跳过的非法目录记录数
    pub skipped: usize,
}

/// 链接监控调度器
///
/// 周期性读取链接目录，刷新跟踪集合，并为新激活的链接启动轮询器池
pub struct MonitorScheduler {
    directory: Arc<dyn LinkDirectory>,
    tracked: Arc<TrackedLinks>,
    registry: Arc<PollerRegistry>,
    spawner: WorkerPoolSpawner,
    tick_interval: Duration,
    /// 保证同一时刻只有一次调度在写跟踪集合
    tick_lock: Mutex<()>,
}

impl MonitorScheduler {
    /// 创建新的调度器实例
    ///
    /// # 参数
    ///
    /// * `directory` - 链接目录
    /// * `deps` - 轮询器依赖
    /// * `tick_interval` - 调度间隔
    pub fn new(
        directory: Arc<dyn LinkDirectory>,
        deps: PollerDeps,
        tick_interval: Duration,
    ) -> Self {
        let tracked = Arc::new(TrackedLinks::new());
        let registry = Arc::new(PollerRegistry::new());
        let spawner = WorkerPoolSpawner::new(Arc::clone(&tracked), Arc::clone(&registry), deps);

        Self {
            directory,
            tracked,
            registry,
            spawner,
            tick_interval,
            tick_lock: Mutex::new(()),
        }
    }

    pub fn tracked(&self) -> &Arc<TrackedLinks> {
        &self.tracked
    }

    pub fn registry(&self) -> &Arc<PollerRegistry> {
        &self.registry
    }

    /// 执行一次调度
    ///
    /// 目录读取失败时保留上一次的跟踪集合并返回错误。
    /// 不等待新启动的轮询器。
    pub async fn tick(&self) -> Result<TickSummary, SchedulerError> {
        let _lock = self.tick_lock.lock().await;
        let started = Instant::now();

        let records = self.directory.active_links().await?;

        let mut summary = TickSummary::default();
        let mut public = Vec::new();
        let mut private = Vec::new();

        for record in records {
            match Link::try_from(record) {
                Ok(link) => match link.category {
                    LinkCategory::Public => public.push(link),
                    LinkCategory::Private => private.push(link),
                },
                Err(e) => {
                    warn!("Skipping malformed link: {}", e);
                    summary.skipped += 1;
                }
            }
        }

        for (category, links) in [
            (LinkCategory::Public, public),
            (LinkCategory::Private, private),
        ] {
            let activated = self.tracked.replace(category, links);
            let tracked = self.tracked.len(category);
            gauge!("tracked_links", "category" => category.as_str()).set(tracked as f64);

            match category {
                LinkCategory::Public => summary.tracked_public = tracked,
                LinkCategory::Private => summary.tracked_private = tracked,
            }

            summary.activated += activated.len();
            for link in &activated {
                summary.spawned_pollers += self.spawner.spawn_pool(link);
            }
        }

        if summary.skipped > 0 {
            counter!("links_skipped_total").increment(summary.skipped as u64);
        }
        histogram!("scheduler_tick_duration_seconds").record(started.elapsed().as_secs_f64());

        if summary.activated > 0 {
            info!(
                "Scheduler tick: {} public, {} private, {} activated, {} pollers started",
                summary.tracked_public,
                summary.tracked_private,
                summary.activated,
                summary.spawned_pollers
            );
        } else {
            debug!(?summary, "Scheduler tick");
        }

        Ok(summary)
    }

    /// 启动调度器后台任务
    ///
    /// # 返回值
    ///
    /// 返回后台任务的句柄
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = interval(scheduler.tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                "Monitor scheduler started, interval {:?}",
                scheduler.tick_interval
            );

            loop {
                ticker.tick().await;

                if let Err(e) = scheduler.tick().await {
                    counter!("scheduler_tick_errors_total").increment(1);
                    error!("Scheduler tick failed: {}", e);
                }
            }
        })
    }

    /// 停止所有轮询器
    ///
    /// 清空跟踪集合，轮询器在下一次循环检查时自行退出。
    /// 调用方应先中止 [`MonitorScheduler::start`] 返回的任务。
    ///
    /// # 返回值
    ///
    /// 在宽限期内全部退出返回true
    pub async fn shutdown(&self, grace: Duration) -> bool {
        {
            let _lock = self.tick_lock.lock().await;
            self.tracked.clear();
        }
        info!(
            "Waiting for {} pollers to stop",
            self.registry.active_count()
        );

        let deadline = Instant::now() + grace;
        while self.registry.active_count() > 0 {
            if Instant::now() >= deadline {
                warn!(
                    "Shutdown grace period elapsed with {} pollers still running",
                    self.registry.active_count()
                );
                return false;
            }
            sleep(Duration::from_millis(50)).await;
        }

        info!("All pollers stopped");
        true
    }
}
