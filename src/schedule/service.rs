use crate::schedule::model::{GameStatus, GameView, RefereeView, StadiumView, TeamSide};
use crate::storage::entity::game::Model as GameModel;
use crate::storage::repository::{
    DirectoryRepository, GameRepository, RefereeRepository, StadiumRepository,
};
use crate::storage::{StorageError, Table};
use log::info;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::path::Path;

type NameMap = HashMap<i32, String>;

struct GameLookups {
    leagues: NameMap,
    stadiums: NameMap,
    teams: NameMap,
    referees: NameMap,
}

impl GameLookups {
    async fn load(db: &DatabaseConnection) -> Result<Self, StorageError> {
        Ok(Self {
            leagues: DirectoryRepository::name_map(db, Table::League).await?,
            stadiums: DirectoryRepository::name_map(db, Table::Stadium).await?,
            teams: DirectoryRepository::name_map(db, Table::Team).await?,
            referees: DirectoryRepository::name_map(db, Table::Referee).await?,
        })
    }

    fn view(&self, g: GameModel) -> GameView {
        let pick = |map: &NameMap, id: Option<i32>| id.and_then(|id| map.get(&id).cloned());
        let side = |id: Option<i32>, year: Option<i32>| {
            pick(&self.teams, id).map(|name| TeamSide { name, year })
        };
        GameView {
            id: g.id,
            league: pick(&self.leagues, g.league_id),
            year: g.year,
            month: g.month,
            day: g.day,
            time: g.time,
            stadium: pick(&self.stadiums, Some(g.stadium_id)),
            team_home: side(g.team_home, g.team_home_year),
            team_guest: side(g.team_guest, g.team_guest_year),
            referee_chief: pick(&self.referees, Some(g.referee_chief)),
            referee_first: pick(&self.referees, g.referee_first),
            referee_second: pick(&self.referees, g.referee_second),
            referee_reserve: pick(&self.referees, g.referee_reserve),
            game_passed: g.game_passed,
            pay_done: g.pay_done,
            payment: g.payment,
            status: GameStatus::derive(g.game_passed, g.pay_done),
        }
    }
}

pub struct ScheduleService;

impl ScheduleService {
    /// All games in display order with names resolved.
    pub async fn game_views(db: &DatabaseConnection) -> Result<Vec<GameView>, StorageError> {
        let lookups = GameLookups::load(db).await?;
        let games = GameRepository::list_ordered(db).await?;
        Ok(games.into_iter().map(|g| lookups.view(g)).collect())
    }

    pub async fn referee_views(db: &DatabaseConnection) -> Result<Vec<RefereeView>, StorageError> {
        let categories = DirectoryRepository::name_map(db, Table::Category).await?;
        let refs = RefereeRepository::list_ordered(db).await?;
        Ok(refs
            .into_iter()
            .map(|r| RefereeView {
                id: r.id,
                category: r.category_id.and_then(|id| categories.get(&id).cloned()),
                first_name: r.first_name,
                second_name: r.second_name,
                third_name: r.third_name,
                phone: r.phone,
            })
            .collect())
    }

    pub async fn stadium_views(db: &DatabaseConnection) -> Result<Vec<StadiumView>, StorageError> {
        let cities = DirectoryRepository::name_map(db, Table::City).await?;
        let stadiums = StadiumRepository::list_ordered(db).await?;
        Ok(stadiums
            .into_iter()
            .map(|s| StadiumView {
                id: s.id,
                city: s.city_id.and_then(|id| cities.get(&id).cloned()),
                name: s.name,
                address: s.address,
            })
            .collect())
    }

    /// Writes the game list as pretty JSON, returns how many games were written.
    pub async fn export_games(db: &DatabaseConnection, path: &Path) -> anyhow::Result<usize> {
        let games = Self::game_views(db).await?;
        let json = serde_json::to_string_pretty(&games)?;
        tokio::fs::write(path, json).await?;
        info!("exported {} games to {}", games.len(), path.display());
        Ok(games.len())
    }
}
