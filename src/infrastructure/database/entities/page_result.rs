// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub scrape_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub page_title: String,
    #[sea_orm(column_type = "Text")]
    pub page_link: String,
    pub page_ranking: i32,
    #[sea_orm(column_type = "Text")]
    pub page_content_text: String,
    pub page_scrape_status: String,
    #[sea_orm(column_type = "Text")]
    pub page_scrape_log: String,
    pub created_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::scrape::Entity",
        from = "Column::ScrapeId",
        to = "super::scrape::Column::Id",
        on_delete = "Cascade"
    )]
    Scrape,
}

impl Related<super::scrape::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scrape.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
