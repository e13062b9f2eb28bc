use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// The table itself is created from explicit DDL in `connection.rs` so that the
// CHECK constraints survive; keep both in sync.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(nullable)]
    pub league_id: Option<i32>,
    pub stadium_id: i32,
    #[sea_orm(nullable)]
    pub team_home: Option<i32>,
    #[sea_orm(nullable)]
    pub team_guest: Option<i32>,
    pub referee_chief: i32,
    #[sea_orm(nullable)]
    pub referee_first: Option<i32>,
    #[sea_orm(nullable)]
    pub referee_second: Option<i32>,
    #[sea_orm(nullable)]
    pub referee_reserve: Option<i32>,
    pub game_passed: bool,
    #[sea_orm(nullable)]
    pub payment: Option<i32>,
    pub pay_done: bool,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub time: i32, // HH * 100 + MM
    #[sea_orm(nullable)]
    pub team_home_year: Option<i32>,
    #[sea_orm(nullable)]
    pub team_guest_year: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::league::Entity",
        from = "Column::LeagueId",
        to = "super::league::Column::Id"
    )]
    League,
    #[sea_orm(
        belongs_to = "super::stadium::Entity",
        from = "Column::StadiumId",
        to = "super::stadium::Column::Id"
    )]
    Stadium,
    #[sea_orm(
        belongs_to = "super::referee::Entity",
        from = "Column::RefereeChief",
        to = "super::referee::Column::Id"
    )]
    RefereeChief,
}

impl ActiveModelBehavior for ActiveModel {}
