// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// 领域错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 目录中的链接记录无法转换为有效链接
    #[error("Invalid link {id}: {reason}")]
    InvalidLink { id: i64, reason: String },

    #[error("Unknown link category: {0}")]
    UnknownCategory(String),
}

/// 调度器错误类型
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Link directory unavailable: {0}")]
    Directory(#[from] RepositoryError),
}
