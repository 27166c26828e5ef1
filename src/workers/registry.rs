// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::link::LinkId;
use crate::gateway::traits::FetchStrategy;
use dashmap::DashMap;
use metrics::gauge;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 轮询器标识：链接、抓取策略与序号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PollerKey {
    pub link_id: LinkId,
    pub strategy: FetchStrategy,
    pub ordinal: u32,
}

impl fmt::Display for PollerKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}#{}", self.link_id, self.strategy, self.ordinal)
    }
}

/// 轮询器状态
///
/// Running → Stopped，停止后的任务不会重启；登记表中不存在的标识视为已停止
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerEntry {
    /// 最近一次注册所属的激活编号
    pub activation: u64,
    /// 该标识自上次全部停止以来被启动的次数
    pub spawn_count: u32,
}

/// 轮询器登记表
///
/// 只保存正在运行的轮询器，任务结束时移除对应条目
#[derive(Debug, Default)]
pub struct PollerRegistry {
    entries: DashMap<PollerKey, PollerEntry>,
    running: AtomicUsize,
}

impl PollerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个即将启动的轮询器
    ///
    /// 返回的守卫在轮询任务结束（包括panic）时将其移除
    pub fn register(self: &Arc<Self>, key: PollerKey, activation: u64) -> PollerGuard {
        self.entries
            .entry(key)
            .and_modify(|entry| {
                entry.activation = activation;
                entry.spawn_count += 1;
            })
            .or_insert(PollerEntry {
                activation,
                spawn_count: 1,
            });

        self.running.fetch_add(1, Ordering::SeqCst);
        gauge!("active_pollers").increment(1.0);

        PollerGuard {
            registry: Arc::clone(self),
            key,
            activation,
        }
    }

    fn mark_stopped(&self, key: PollerKey, activation: u64) {
        // A newer activation may already own this key
        self.entries
            .remove_if(&key, |_, entry| entry.activation == activation);

        self.running.fetch_sub(1, Ordering::SeqCst);
        gauge!("active_pollers").decrement(1.0);
    }

    /// 正在运行的轮询任务数
    pub fn active_count(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// 登记表中保存的条目数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state_of(&self, key: &PollerKey) -> PollerState {
        if self.entries.contains_key(key) {
            PollerState::Running
        } else {
            PollerState::Stopped
        }
    }

    pub fn entry(&self, key: &PollerKey) -> Option<PollerEntry> {
        self.entries.get(key).map(|entry| *entry)
    }

    /// 某链接某策略下正在运行的序号，升序
    pub fn running_ordinals(&self, link_id: LinkId, strategy: FetchStrategy) -> Vec<u32> {
        let mut ordinals: Vec<u32> = self
            .entries
            .iter()
            .filter(|item| item.key().link_id == link_id && item.key().strategy == strategy)
            .map(|item| item.key().ordinal)
            .collect();
        ordinals.sort_unstable();
        ordinals
    }
}

/// 轮询器登记守卫
pub struct PollerGuard {
    registry: Arc<PollerRegistry>,
    key: PollerKey,
    activation: u64,
}

impl Drop for PollerGuard {
    fn drop(&mut self) {
        self.registry.mark_stopped(self.key, self.activation);
    }
}
