use crate::storage::entity::stadium::{self, Entity as Stadium, Model as StadiumModel};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

pub struct StadiumRepository;

impl StadiumRepository {
    pub async fn list_ordered(
        db: &DatabaseConnection,
    ) -> Result<Vec<StadiumModel>, sea_orm::DbErr> {
        Stadium::find()
            .order_by_asc(stadium::Column::Name)
            .all(db)
            .await
    }

    pub async fn find(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<StadiumModel>, sea_orm::DbErr> {
        Stadium::find_by_id(id).one(db).await
    }
}
