//! Text formats accepted by data-entry fields.

use crate::schedule::model::encode_time;
use crate::storage::Table;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Text,
    /// `(+7|8)(XXX)XXX-XX-XX`
    Phone,
    /// `DD.MM.YYYY` or `DD.MM.YY`
    Date,
    /// `HH:MM`, hours 01–24
    Time,
    Integer,
    Year,
    Flag,
    /// Name of a row in another table.
    Lookup(Table),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Empty,
    Text(String),
    Int(i64),
    Flag(bool),
    Date(NaiveDate),
    /// Encoded as `HH * 100 + MM`.
    Time(i32),
    Name(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{label}: expected {expected}, got {value:?}")]
    Format {
        label: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("{label}: {value} is not a calendar date")]
    Calendar { label: &'static str, value: String },
    #[error("{label}: no {table} named {name:?}")]
    UnknownName {
        label: &'static str,
        table: &'static str,
        name: String,
    },
    #[error("{table} has no field {field:?}")]
    UnknownField { table: &'static str, field: String },
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\+7|8)\(\d{3}\)\d{3}-\d{2}-\d{2}$").expect("phone pattern"))
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(0[1-9]|[12]\d|3[01])\.(0[1-9]|1[0-2])\.(\d{4}|\d{2})$").expect("date pattern")
    })
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(0[1-9]|1\d|2[0-4]):([0-5]\d)$").expect("time pattern"))
}

impl FieldFormat {
    /// Human hint shown next to the field.
    pub fn hint(self) -> &'static str {
        match self {
            FieldFormat::Text => "text",
            FieldFormat::Phone => "+7(XXX)XXX-XX-XX",
            FieldFormat::Date => "DD.MM.YYYY",
            FieldFormat::Time => "HH:MM",
            FieldFormat::Integer => "whole number",
            FieldFormat::Year => "YYYY",
            FieldFormat::Flag => "0/1",
            FieldFormat::Lookup(_) => "name, Tab completes",
        }
    }

    fn max_len(self) -> usize {
        match self {
            FieldFormat::Phone => 16,
            FieldFormat::Date => 10,
            FieldFormat::Time => 5,
            FieldFormat::Integer => 9,
            FieldFormat::Year => 4,
            FieldFormat::Flag => 5,
            FieldFormat::Text | FieldFormat::Lookup(_) => 60,
        }
    }

    fn allows_char(self, ch: char) -> bool {
        match self {
            FieldFormat::Phone => ch.is_ascii_digit() || matches!(ch, '+' | '(' | ')' | '-'),
            FieldFormat::Date => ch.is_ascii_digit() || ch == '.',
            FieldFormat::Time => ch.is_ascii_digit() || ch == ':',
            FieldFormat::Integer | FieldFormat::Year => ch.is_ascii_digit(),
            FieldFormat::Flag => ch.is_ascii_alphanumeric(),
            FieldFormat::Text | FieldFormat::Lookup(_) => !ch.is_control(),
        }
    }

    /// Keystroke filter: whether `ch` may be appended to `current`.
    pub fn accepts(self, current: &str, ch: char) -> bool {
        self.allows_char(ch) && current.chars().count() < self.max_len()
    }

    /// Checks `raw` against the format. Blank input yields [`FieldValue::Empty`].
    pub fn parse(self, label: &'static str, raw: &str) -> Result<FieldValue, FieldError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(FieldValue::Empty);
        }
        let bad = || FieldError::Format {
            label,
            expected: self.hint(),
            value: raw.to_string(),
        };

        match self {
            FieldFormat::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldFormat::Lookup(_) => Ok(FieldValue::Name(raw.to_string())),
            FieldFormat::Phone => {
                if phone_re().is_match(raw) {
                    Ok(FieldValue::Text(raw.to_string()))
                } else {
                    Err(bad())
                }
            }
            FieldFormat::Date => {
                let caps = date_re().captures(raw).ok_or_else(bad)?;
                let day: u32 = caps[1].parse().map_err(|_| bad())?;
                let month: u32 = caps[2].parse().map_err(|_| bad())?;
                let mut year: i32 = caps[3].parse().map_err(|_| bad())?;
                if caps[3].len() == 2 {
                    year += 2000;
                }
                NaiveDate::from_ymd_opt(year, month, day)
                    .filter(|d| d.year() > 0)
                    .map(FieldValue::Date)
                    .ok_or(FieldError::Calendar {
                        label,
                        value: raw.to_string(),
                    })
            }
            FieldFormat::Time => {
                let caps = time_re().captures(raw).ok_or_else(bad)?;
                let hour: u32 = caps[1].parse().map_err(|_| bad())?;
                let minute: u32 = caps[2].parse().map_err(|_| bad())?;
                // 24:MM is accepted on input and stored as midnight
                Ok(FieldValue::Time(encode_time(hour % 24, minute)))
            }
            // column is a 32-bit INTEGER; amounts are never negative
            FieldFormat::Integer => match raw.parse::<i32>() {
                Ok(v) if v >= 0 => Ok(FieldValue::Int(v as i64)),
                _ => Err(bad()),
            },
            FieldFormat::Year => match raw.parse::<i64>() {
                Ok(y) if raw.len() == 4 && y > 0 => Ok(FieldValue::Int(y)),
                _ => Err(bad()),
            },
            FieldFormat::Flag => match raw.to_ascii_lowercase().as_str() {
                "1" | "y" | "yes" | "true" | "on" => Ok(FieldValue::Flag(true)),
                "0" | "n" | "no" | "false" | "off" => Ok(FieldValue::Flag(false)),
                _ => Err(bad()),
            },
        }
    }
}
