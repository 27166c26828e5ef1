// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 主函数
///
/// 链接、评论与关键词表的迁移命令行入口
#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
