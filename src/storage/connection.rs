use crate::storage::entity::{category, city, league, referee, stadium, team};
use log::info;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use std::time::Duration;

const CREATE_GAMES: &str = r#"CREATE TABLE IF NOT EXISTS "Games" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    league_id INTEGER,
    stadium_id INTEGER NOT NULL,
    team_home INTEGER,
    team_guest INTEGER,
    referee_chief INTEGER NOT NULL,
    referee_first INTEGER,
    referee_second INTEGER,
    referee_reserve INTEGER,
    game_passed INTEGER NOT NULL DEFAULT 0,
    payment INTEGER,
    pay_done INTEGER NOT NULL DEFAULT 0,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL,
    day INTEGER NOT NULL,
    time INTEGER NOT NULL,
    team_home_year INTEGER,
    team_guest_year INTEGER,
    FOREIGN KEY (league_id) REFERENCES "League"(id),
    FOREIGN KEY (stadium_id) REFERENCES "Stadium"(id),
    FOREIGN KEY (team_home) REFERENCES "Team"(id),
    FOREIGN KEY (team_guest) REFERENCES "Team"(id),
    FOREIGN KEY (referee_chief) REFERENCES "Referee"(id),
    FOREIGN KEY (referee_first) REFERENCES "Referee"(id),
    FOREIGN KEY (referee_second) REFERENCES "Referee"(id),
    FOREIGN KEY (referee_reserve) REFERENCES "Referee"(id),
    CHECK (year > 0 AND month > 0 AND month <= 12 AND day > 0 AND day <= 31
        AND game_passed IN (0, 1) AND pay_done IN (0, 1))
)"#;

fn connect_options(db_url: &str) -> ConnectOptions {
    let mut opt = ConnectOptions::new(db_url.to_owned());
    if db_url.contains(":memory:") {
        // every pooled connection would otherwise get its own empty database
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(4)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(60));
    }
    opt.connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);
    opt
}

pub async fn establish_connection(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(connect_options(db_url)).await?;

    let _ = db
        .execute(sea_orm::Statement::from_string(
            sea_orm::DatabaseBackend::Sqlite,
            "PRAGMA journal_mode=WAL;".to_string(),
        ))
        .await?;

    // referenced tables first so the foreign keys resolve
    create_from_entity(&db, category::Entity).await?;
    create_from_entity(&db, city::Entity).await?;
    create_from_entity(&db, league::Entity).await?;
    create_from_entity(&db, team::Entity).await?;
    create_from_entity(&db, referee::Entity).await?;
    create_from_entity(&db, stadium::Entity).await?;

    db.execute(sea_orm::Statement::from_string(
        sea_orm::DatabaseBackend::Sqlite,
        CREATE_GAMES.to_string(),
    ))
    .await?;

    info!("Database {} ready, tables initialized.", redact(db_url));

    Ok(db)
}

async fn create_from_entity<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let stmt = builder.build(schema.create_table_from_entity(entity).if_not_exists());
    db.execute(stmt).await?;
    Ok(())
}

fn redact(db_url: &str) -> &str {
    db_url.split('?').next().unwrap_or(db_url)
}
