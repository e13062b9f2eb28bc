use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::referee::Entity")]
    Referee,
}

impl Related<super::referee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Referee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
