// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::link::{Link, LinkCategory, LinkId, LiveLink};
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

pub type LinkMap = HashMap<LinkId, Arc<LiveLink>>;

/// 各类别当前跟踪的链接集合
///
/// 每个类别的集合整体替换，读者总是看到某一次调度的完整快照。
/// 只有调度器写入；轮询器通过 [`TrackedLinks::get`] 读取。
pub struct TrackedLinks {
    public: ArcSwap<LinkMap>,
    private: ArcSwap<LinkMap>,
    next_activation: AtomicU64,
}

impl Default for TrackedLinks {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackedLinks {
    pub fn new() -> Self {
        Self {
            public: ArcSwap::from_pointee(LinkMap::new()),
            private: ArcSwap::from_pointee(LinkMap::new()),
            next_activation: AtomicU64::new(1),
        }
    }

    fn slot(&self, category: LinkCategory) -> &ArcSwap<LinkMap> {
        match category {
            LinkCategory::Public => &self.public,
            LinkCategory::Private => &self.private,
        }
    }

    /// 当前快照
    pub fn snapshot(&self, category: LinkCategory) -> Arc<LinkMap> {
        self.slot(category).load_full()
    }

    pub fn get(&self, category: LinkCategory, id: LinkId) -> Option<Arc<LiveLink>> {
        self.slot(category).load().get(&id).cloned()
    }

    pub fn len(&self, category: LinkCategory) -> usize {
        self.slot(category).load().len()
    }

    pub fn is_empty(&self) -> bool {
        LinkCategory::ALL.iter().all(|c| self.len(*c) == 0)
    }

    /// 用新的快照替换类别的跟踪集合
    ///
    /// 已跟踪的链接沿用同一条共享记录，仅刷新并发数、间隔和水位线；
    /// 未跟踪的链接获得新的激活编号。返回本次新激活的链接。
    pub fn replace(&self, category: LinkCategory, links: Vec<Link>) -> Vec<Arc<LiveLink>> {
        let slot = self.slot(category);
        let previous = slot.load_full();

        let mut next = LinkMap::with_capacity(links.len());
        let mut activated = Vec::new();

        for link in links {
            if next.contains_key(&link.id) {
                warn!(link_id = link.id, category = %category, "Duplicate link in snapshot, keeping first entry");
                continue;
            }

            let live = match previous.get(&link.id) {
                Some(live) => {
                    live.apply_config(&link);
                    Arc::clone(live)
                }
                None => {
                    let activation = self.next_activation.fetch_add(1, Ordering::Relaxed);
                    let live = Arc::new(LiveLink::new(link, activation));
                    activated.push(Arc::clone(&live));
                    live
                }
            };
            next.insert(live.id(), live);
        }

        slot.store(Arc::new(next));
        activated
    }

    /// 清空全部类别，所有轮询器将在下一次检查时退出
    pub fn clear(&self) {
        for category in LinkCategory::ALL {
            self.slot(category).store(Arc::new(LinkMap::new()));
        }
    }
}
