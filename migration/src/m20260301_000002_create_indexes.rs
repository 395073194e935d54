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
        // Baseline lookup: latest completed scrape per query
        manager
            .create_index(
                Index::create()
                    .name("idx_scrapes_query_id_completed_at")
                    .table(Scrapes::Table)
                    .col(Scrapes::QueryId)
                    .col(Scrapes::CompletedAt)
                    .to_owned(),
            )
            .await?;

        // Worker polling
        manager
            .create_index(
                Index::create()
                    .name("idx_scrapes_status_started_at")
                    .table(Scrapes::Table)
                    .col(Scrapes::Status)
                    .col(Scrapes::StartedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_results_scrape_id_page_link")
                    .table(Results::Table)
                    .col(Results::ScrapeId)
                    .col(Results::PageLink)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_results_scrape_id_page_link")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_scrapes_status_started_at")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_scrapes_query_id_completed_at")
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Scrapes {
    Table,
    QueryId,
    CompletedAt,
    Status,
    StartedAt,
}

#[derive(DeriveIden)]
enum Results {
    Table,
    ScrapeId,
    PageLink,
}
