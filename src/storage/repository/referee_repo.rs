use crate::storage::entity::referee::{self, Entity as Referee, Model as RefereeModel};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

pub struct RefereeRepository;

impl RefereeRepository {
    pub async fn list_ordered(
        db: &DatabaseConnection,
    ) -> Result<Vec<RefereeModel>, sea_orm::DbErr> {
        Referee::find()
            .order_by_asc(referee::Column::SecondName)
            .order_by_asc(referee::Column::FirstName)
            .order_by_asc(referee::Column::ThirdName)
            .all(db)
            .await
    }

    pub async fn find(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<RefereeModel>, sea_orm::DbErr> {
        Referee::find_by_id(id).one(db).await
    }
}
