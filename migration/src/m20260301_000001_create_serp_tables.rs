// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Queries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Queries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Queries::Query).text().not_null().unique_key())
                    .col(
                        ColumnDef::new(Queries::IntervalNoOfMonths)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Queries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Scrapes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Scrapes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Scrapes::QueryId).uuid().not_null())
                    .col(
                        ColumnDef::new(Scrapes::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Scrapes::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Scrapes::Status)
                            .string_len(15)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Scrapes::Log).text())
                    .col(ColumnDef::new(Scrapes::ClaimedBy).uuid())
                    .col(ColumnDef::new(Scrapes::ClaimedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scrapes_query_id")
                            .from(Scrapes::Table, Scrapes::QueryId)
                            .to(Queries::Table, Queries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Results::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Results::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Results::ScrapeId).uuid().not_null())
                    .col(ColumnDef::new(Results::PageTitle).text().not_null())
                    .col(ColumnDef::new(Results::PageLink).text().not_null())
                    .col(ColumnDef::new(Results::PageRanking).integer().not_null())
                    .col(
                        ColumnDef::new(Results::PageContentText)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Results::PageScrapeStatus)
                            .string_len(15)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Results::PageScrapeLog)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Results::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_results_scrape_id")
                            .from(Results::Table, Results::ScrapeId)
                            .to(Scrapes::Table, Scrapes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Differences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Differences::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Differences::Result1Id).uuid().not_null())
                    .col(ColumnDef::new(Differences::Result2Id).uuid().not_null())
                    .col(
                        ColumnDef::new(Differences::ContentDifference)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Differences::TitleDifference)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Differences::RankingDifference)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Differences::HasDifference)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Differences::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_differences_result1_id")
                            .from(Differences::Table, Differences::Result1Id)
                            .to(Results::Table, Results::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_differences_result2_id")
                            .from(Differences::Table, Differences::Result2Id)
                            .to(Results::Table, Results::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Differences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Results::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Scrapes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Queries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Queries {
    Table,
    Id,
    Query,
    IntervalNoOfMonths,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Scrapes {
    Table,
    Id,
    QueryId,
    StartedAt,
    CompletedAt,
    Status,
    Log,
    ClaimedBy,
    ClaimedAt,
}

#[derive(DeriveIden)]
enum Results {
    Table,
    Id,
    ScrapeId,
    PageTitle,
    PageLink,
    PageRanking,
    PageContentText,
    PageScrapeStatus,
    PageScrapeLog,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Differences {
    Table,
    Id,
    #[sea_orm(iden = "result1_id")]
    Result1Id,
    #[sea_orm(iden = "result2_id")]
    Result2Id,
    ContentDifference,
    TitleDifference,
    RankingDifference,
    HasDifference,
    CreatedAt,
}
