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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含数据库、外部网关、监控调度、指标和日志等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 外部网关配置
    pub gateway: GatewaySettings,
    /// 监控调度配置
    pub monitoring: MonitoringSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 外部网关配置设置
///
/// 评论源、身份解析和评论隐藏都通过同一个网关访问
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    /// 网关基础URL
    pub base_url: String,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
    /// 请求使用的User-Agent
    pub user_agent: String,
}

/// 监控调度配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringSettings {
    /// 调度周期（秒）
    pub tick_interval_secs: u64,
    /// 关闭时等待轮询器退出的最长时间（秒）
    pub shutdown_grace_secs: u64,
}

impl MonitoringSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs.max(1))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 默认日志过滤级别，`RUST_LOG` 存在时被覆盖
    pub level: String,
    /// 是否输出JSON格式日志
    pub json: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 按默认值、配置文件、环境变量的顺序加载配置
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("COMMENTWATCH").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅包含默认值的配置构建器
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Default DB settings
            .set_default("database.url", "sqlite://commentwatch.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default gateway settings
            .set_default("gateway.base_url", "http://127.0.0.1:8080/")?
            .set_default("gateway.timeout_secs", 15)?
            .set_default("gateway.user_agent", "commentwatch/0.1")?
            // Default monitoring settings
            .set_default("monitoring.tick_interval_secs", 5)?
            .set_default("monitoring.shutdown_grace_secs", 30)?
            // Default metrics settings
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            // Default logging settings
            .set_default("logging.level", "info,commentwatch=debug")?
            .set_default("logging.json", false)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
