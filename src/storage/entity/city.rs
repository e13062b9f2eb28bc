use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "City")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stadium::Entity")]
    Stadium,
}

impl Related<super::stadium::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stadium.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
