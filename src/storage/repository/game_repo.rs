use crate::storage::entity::game::{self, Entity as Game, Model as GameModel};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

pub struct GameRepository;

impl GameRepository {
    /// Newest date first, earliest kickoff first within a day.
    pub async fn list_ordered(db: &DatabaseConnection) -> Result<Vec<GameModel>, sea_orm::DbErr> {
        Game::find()
            .order_by_desc(game::Column::Year)
            .order_by_desc(game::Column::Month)
            .order_by_desc(game::Column::Day)
            .order_by_asc(game::Column::Time)
            .all(db)
            .await
    }

    pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<GameModel>, sea_orm::DbErr> {
        Game::find_by_id(id).one(db).await
    }

    pub async fn mark_passed(db: &DatabaseConnection, id: i32) -> Result<u64, sea_orm::DbErr> {
        let res = Game::update_many()
            .col_expr(game::Column::GamePassed, Expr::value(true))
            .filter(game::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// A paid game is necessarily a played one, so both flags are set.
    pub async fn mark_paid(db: &DatabaseConnection, id: i32) -> Result<u64, sea_orm::DbErr> {
        let res = Game::update_many()
            .col_expr(game::Column::GamePassed, Expr::value(true))
            .col_expr(game::Column::PayDone, Expr::value(true))
            .filter(game::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64, sea_orm::DbErr> {
        let res = Game::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected)
    }
}
