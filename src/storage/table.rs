use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every table the application persists, with the names used on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    Games,
    Referee,
    Stadium,
    Team,
    League,
    Category,
    City,
}

const GAMES_COLUMNS: &[&str] = &[
    "id",
    "league_id",
    "stadium_id",
    "team_home",
    "team_guest",
    "referee_chief",
    "referee_first",
    "referee_second",
    "referee_reserve",
    "game_passed",
    "payment",
    "pay_done",
    "year",
    "month",
    "day",
    "time",
    "team_home_year",
    "team_guest_year",
];

const REFEREE_COLUMNS: &[&str] = &[
    "id",
    "first_name",
    "second_name",
    "third_name",
    "phone",
    "category_id",
];

const STADIUM_COLUMNS: &[&str] = &["id", "name", "address", "city_id"];

const NAME_COLUMNS: &[&str] = &["id", "name"];

impl Table {
    #[cfg(test)]
    pub const ALL: [Table; 7] = [
        Table::Games,
        Table::Referee,
        Table::Stadium,
        Table::Team,
        Table::League,
        Table::Category,
        Table::City,
    ];

    /// Tables whose rows can be picked by name from another form.
    pub const fn lookups() -> [Table; 6] {
        [
            Table::Referee,
            Table::Stadium,
            Table::Team,
            Table::League,
            Table::Category,
            Table::City,
        ]
    }

    /// Tables that only carry `id` and `name`.
    pub const fn name_tables() -> [Table; 4] {
        [Table::Team, Table::League, Table::Category, Table::City]
    }

    pub fn name(self) -> &'static str {
        match self {
            Table::Games => "Games",
            Table::Referee => "Referee",
            Table::Stadium => "Stadium",
            Table::Team => "Team",
            Table::League => "League",
            Table::Category => "Category",
            Table::City => "City",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Games => GAMES_COLUMNS,
            Table::Referee => REFEREE_COLUMNS,
            Table::Stadium => STADIUM_COLUMNS,
            Table::Team | Table::League | Table::Category | Table::City => NAME_COLUMNS,
        }
    }

    pub fn has_column(self, column: &str) -> bool {
        self.columns().contains(&column)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "game" | "games" => Ok(Table::Games),
            "referee" | "referees" | "ref" => Ok(Table::Referee),
            "stadium" | "stadiums" => Ok(Table::Stadium),
            "team" | "teams" => Ok(Table::Team),
            "league" | "leagues" => Ok(Table::League),
            "category" | "categories" => Ok(Table::Category),
            "city" | "cities" => Ok(Table::City),
            other => Err(format!("unknown table: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_singular_and_plural_names() {
        assert_eq!("game".parse::<Table>(), Ok(Table::Games));
        assert_eq!("Referees".parse::<Table>(), Ok(Table::Referee));
        assert_eq!("cities".parse::<Table>(), Ok(Table::City));
        assert!("players".parse::<Table>().is_err());
    }

    #[test]
    fn column_registry_matches_schema() {
        assert!(Table::Games.has_column("referee_reserve"));
        assert!(Table::Referee.has_column("category_id"));
        assert!(!Table::Team.has_column("address"));
        assert!(!Table::Games.has_column("id; DROP TABLE Games"));
    }
}
