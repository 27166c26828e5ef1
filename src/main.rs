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

use commentwatch::config::settings::Settings;
use commentwatch::domain::services::comment_filter::CommentFilter;
use commentwatch::gateway::client;
use commentwatch::gateway::comment_source::HttpCommentSource;
use commentwatch::gateway::identity_resolver::HttpIdentityResolver;
use commentwatch::gateway::side_effect::HttpHideCommentActuator;
use commentwatch::infrastructure::database::connection;
use commentwatch::infrastructure::metrics::init_metrics;
use commentwatch::infrastructure::repositories::comment_repo_impl::CommentRepoImpl;
use commentwatch::infrastructure::repositories::keyword_repo_impl::KeywordRepoImpl;
use commentwatch::infrastructure::repositories::link_directory_impl::LinkDirectoryImpl;
use commentwatch::scheduler::monitor_scheduler::MonitorScheduler;
use commentwatch::utils::telemetry;
use commentwatch::workers::poller::PollerDeps;
use std::sync::Arc;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动调度器
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new()?;

    // 2. Initialize logging
    telemetry::init_telemetry(&settings.logging);
    info!("Starting commentwatch...");

    // Initialize Prometheus Metrics
    init_metrics(&settings.metrics)?;

    // 3. Connect to database and run migrations
    let db = Arc::new(connection::connect_and_migrate(&settings.database).await?);
    info!("Database connection established");

    // 4. Initialize Components
    let directory = Arc::new(LinkDirectoryImpl::new(db.clone()));
    let keywords = Arc::new(KeywordRepoImpl::new(db.clone()));
    let comments = Arc::new(CommentRepoImpl::new(db.clone()));

    let http = client::build_client(&settings.gateway)?;
    let base_url = client::base_url(&settings.gateway)?;

    let deps = PollerDeps {
        source: Arc::new(HttpCommentSource::new(http.clone(), base_url.clone())),
        identity: Arc::new(HttpIdentityResolver::new(http.clone(), base_url.clone())),
        filter: CommentFilter::new(keywords, comments.clone()),
        sink: comments,
        actuator: Arc::new(HttpHideCommentActuator::new(http, base_url)),
    };

    // 5. Start scheduler
    let scheduler = Arc::new(MonitorScheduler::new(
        directory,
        deps,
        settings.monitoring.tick_interval(),
    ));
    let handle = scheduler.start();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    handle.abort();
    if !scheduler.shutdown(settings.monitoring.shutdown_grace()).await {
        warn!("Exiting with pollers still running");
    }

    info!("commentwatch stopped");
    Ok(())
}
