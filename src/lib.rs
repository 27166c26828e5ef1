// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含链接、评论等核心实体，仓库接口与过滤服务
pub mod domain;

/// 网关模块
///
/// 评论源、身份解析和下游动作的抽象与HTTP实现
pub mod gateway;

/// 基础设施模块
///
/// 提供数据库、指标导出和仓库实现
pub mod infrastructure;

/// 调度模块
///
/// 周期性刷新跟踪集合并为新链接启动轮询器
pub mod scheduler;

/// 工具模块
///
/// 提供错误类型和日志初始化
pub mod utils;

/// 工作器模块
///
/// 实现评论轮询器、轮询器池与登记表
pub mod workers;
