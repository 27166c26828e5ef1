// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 服务上报的计数器及其说明
pub const COUNTERS: &[(&str, &str)] = &[
    ("comments_fetched_total", "Comment events returned by the source"),
    ("comments_accepted_total", "Comments persisted"),
    (
        "comments_rejected_total",
        "Comments skipped by keyword filter or dedup",
    ),
    ("comment_fetch_errors_total", "Failed comment fetches"),
    ("comment_persist_errors_total", "Failed comment saves"),
    ("side_effect_failures_total", "Failed downstream actions"),
    ("links_skipped_total", "Malformed directory entries skipped"),
    (
        "scheduler_tick_errors_total",
        "Scheduler ticks that failed to read the directory",
    ),
];

/// 初始化指标系统
///
/// 安装Prometheus导出器并注册监控相关指标
pub fn init_metrics(settings: &MetricsSettings) -> anyhow::Result<()> {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return Ok(());
    }

    let addr: SocketAddr = settings.listen_addr.parse()?;

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return Ok(());
    }

    for (name, description) in COUNTERS {
        describe_counter!(*name, *description);
    }
    describe_gauge!("tracked_links", "Links currently tracked per category");
    describe_gauge!("active_pollers", "Poller tasks currently running");
    describe_histogram!(
        "scheduler_tick_duration_seconds",
        "Duration of a scheduler tick in seconds"
    );

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}
