// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 评论表迁移
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::CmtId).string().not_null())
                    .col(ColumnDef::new(Comments::LinkId).big_integer().not_null())
                    .col(ColumnDef::new(Comments::PostId).string().not_null())
                    .col(ColumnDef::new(Comments::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Comments::Uid).string().not_null())
                    .col(ColumnDef::new(Comments::Message).text().not_null())
                    .col(ColumnDef::new(Comments::PhoneNumber).string())
                    .col(ColumnDef::new(Comments::Name).string().not_null())
                    .col(
                        ColumnDef::new(Comments::TimeCreated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Comments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per external comment and link, whichever poller saw it first
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_link_cmt")
                    .table(Comments::Table)
                    .col(Comments::LinkId)
                    .col(Comments::CmtId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    CmtId,
    LinkId,
    PostId,
    UserId,
    Uid,
    Message,
    PhoneNumber,
    Name,
    TimeCreated,
    CreatedAt,
}
