use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display status of a game, derived from the two stored flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    NotPassed,
    Passed,
    PayDone,
}

impl GameStatus {
    /// `pay_done` without `game_passed` is not a real state and reads as not passed.
    pub fn derive(game_passed: bool, pay_done: bool) -> Self {
        match (game_passed, pay_done) {
            (true, true) => GameStatus::PayDone,
            (true, false) => GameStatus::Passed,
            (false, _) => GameStatus::NotPassed,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            GameStatus::NotPassed => "not_passed",
            GameStatus::Passed => "passed",
            GameStatus::PayDone => "pay_done",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            GameStatus::NotPassed => "calendar-alert",
            GameStatus::Passed | GameStatus::PayDone => "calendar-check",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            GameStatus::NotPassed => "○",
            GameStatus::Passed => "✓",
            GameStatus::PayDone => "$",
        }
    }

    /// Next status in the filter cycle; `None` means "all".
    pub fn cycle(current: Option<GameStatus>) -> Option<GameStatus> {
        match current {
            None => Some(GameStatus::NotPassed),
            Some(GameStatus::NotPassed) => Some(GameStatus::Passed),
            Some(GameStatus::Passed) => Some(GameStatus::PayDone),
            Some(GameStatus::PayDone) => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GameStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "not_passed" | "pending" => Ok(GameStatus::NotPassed),
            "passed" => Ok(GameStatus::Passed),
            "pay_done" | "paid" => Ok(GameStatus::PayDone),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePart {
    First,
    Second,
    Third,
}

impl FromStr for NamePart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "first" | "first_name" => Ok(NamePart::First),
            "2" | "second" | "second_name" => Ok(NamePart::Second),
            "3" | "third" | "third_name" => Ok(NamePart::Third),
            other => Err(format!(
                "name part must be 1/first/first_name, 2/second/second_name or 3/third/third_name, got {other:?}"
            )),
        }
    }
}

/// Joins the requested name parts in order, skipping empty ones.
pub fn format_name(first: &str, second: &str, third: Option<&str>, parts: &[NamePart]) -> String {
    parts
        .iter()
        .map(|p| match p {
            NamePart::First => first,
            NamePart::Second => second,
            NamePart::Third => third.unwrap_or(""),
        })
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn encode_time(hour: u32, minute: u32) -> i32 {
    (hour * 100 + minute) as i32
}

pub fn decode_time(time: i32) -> (u32, u32) {
    let t = time.max(0) as u32;
    (t / 100, t % 100)
}

pub fn format_time(time: i32) -> String {
    let (h, m) = decode_time(time);
    format!("{h:02}:{m:02}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSide {
    pub name: String,
    pub year: Option<i32>,
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(y) => write!(f, "{} ({})", self.name, y),
            None => f.write_str(&self.name),
        }
    }
}

/// A game row with every foreign key resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub id: i32,
    pub league: Option<String>,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub time: i32,
    pub stadium: Option<String>,
    pub team_home: Option<TeamSide>,
    pub team_guest: Option<TeamSide>,
    pub referee_chief: Option<String>,
    pub referee_first: Option<String>,
    pub referee_second: Option<String>,
    pub referee_reserve: Option<String>,
    pub game_passed: bool,
    pub pay_done: bool,
    pub payment: Option<i32>,
    pub status: GameStatus,
}

impl GameView {
    pub fn date_label(&self) -> String {
        format!("{:02}.{:02}.{:04}", self.day, self.month, self.year)
    }

    pub fn time_label(&self) -> String {
        format_time(self.time)
    }

    pub fn kickoff(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month as u32, self.day as u32)?;
        let (h, m) = decode_time(self.time);
        let time = NaiveTime::from_hms_opt(h, m, 0)?;
        Some(date.and_time(time))
    }

    pub fn matchup(&self) -> String {
        let side = |t: &Option<TeamSide>| t.as_ref().map(|t| t.to_string()).unwrap_or_else(|| "?".into());
        format!("{} – {}", side(&self.team_home), side(&self.team_guest))
    }

    /// Case-insensitive search across the displayed text fields.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        let hay = [
            self.league.as_deref(),
            self.stadium.as_deref(),
            self.team_home.as_ref().map(|t| t.name.as_str()),
            self.team_guest.as_ref().map(|t| t.name.as_str()),
            self.referee_chief.as_deref(),
            self.referee_first.as_deref(),
            self.referee_second.as_deref(),
            self.referee_reserve.as_deref(),
        ];
        hay.iter()
            .flatten()
            .any(|s| s.to_lowercase().contains(&q))
            || self.date_label().contains(&q)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefereeView {
    pub id: i32,
    pub first_name: String,
    pub second_name: String,
    pub third_name: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
}

impl RefereeView {
    pub fn full_name(&self) -> String {
        format_name(
            &self.first_name,
            &self.second_name,
            self.third_name.as_deref(),
            &[NamePart::Second, NamePart::First, NamePart::Third],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StadiumView {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentSummary {
    pub total: usize,
    pub not_passed: usize,
    pub passed: usize,
    pub pay_done: usize,
    /// Sum of payments for games already played.
    pub earned: i64,
    /// Played but not yet paid.
    pub outstanding: i64,
    pub paid: i64,
}

impl PaymentSummary {
    pub fn from_games(games: &[GameView]) -> Self {
        let mut s = PaymentSummary {
            total: games.len(),
            ..Default::default()
        };
        for g in games {
            let amount = g.payment.unwrap_or(0) as i64;
            match g.status {
                GameStatus::NotPassed => s.not_passed += 1,
                GameStatus::Passed => {
                    s.passed += 1;
                    s.earned += amount;
                    s.outstanding += amount;
                }
                GameStatus::PayDone => {
                    s.pay_done += 1;
                    s.earned += amount;
                    s.paid += amount;
                }
            }
        }
        s
    }
}
