// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::link::LiveLink;
use crate::gateway::traits::FetchStrategy;
use crate::scheduler::tracked_links::TrackedLinks;
use crate::workers::poller::{Poller, PollerDeps};
use crate::workers::registry::{PollerKey, PollerRegistry};
use std::sync::Arc;
use tracing::{debug, info};

/// 轮询器池启动器
///
/// 只在链接新激活时调用；已跟踪链接的并发数增加不会补启动轮询器
pub struct WorkerPoolSpawner {
    tracked: Arc<TrackedLinks>,
    registry: Arc<PollerRegistry>,
    deps: PollerDeps,
}

impl WorkerPoolSpawner {
    pub fn new(
        tracked: Arc<TrackedLinks>,
        registry: Arc<PollerRegistry>,
        deps: PollerDeps,
    ) -> Self {
        Self {
            tracked,
            registry,
            deps,
        }
    }

    /// 为新激活的链接启动轮询器
    ///
    /// 每个可用策略启动序号 1..=并发数 的轮询器，返回启动数量
    pub fn spawn_pool(&self, link: &LiveLink) -> usize {
        let snapshot = link.snapshot();
        let thread_count = link.thread_count();
        let mut spawned = 0;

        for strategy in FetchStrategy::for_category(link.category()) {
            if strategy.post_id(&snapshot).is_none() {
                debug!(
                    link_id = link.id(),
                    "Link has no post id for strategy {}, skipping",
                    strategy
                );
                continue;
            }

            for ordinal in 1..=thread_count {
                let key = PollerKey {
                    link_id: link.id(),
                    strategy: *strategy,
                    ordinal,
                };
                let guard = self.registry.register(key, link.activation());
                let poller = Poller::new(
                    key,
                    link.category(),
                    link.activation(),
                    Arc::clone(&self.tracked),
                    self.deps.clone(),
                );

                tokio::spawn(async move {
                    let _guard = guard;
                    poller.run().await;
                });
                spawned += 1;
            }
        }

        info!(
            "Started {} pollers for {} link {} (threads: {})",
            spawned,
            link.category(),
            link.id(),
            thread_count
        );
        spawned
    }
}
