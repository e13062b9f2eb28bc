use crate::form::FormSubmission;
use crate::storage::Table;
use std::str::FromStr;

pub const HELP: &str = "commands: add <table> | set <table> <id> <field> <value> | passed <id> | paid <id> | delete <table> <id> | names <table> [prefix] | export <path> | filter <status|text|clear> | refresh | help | quit";

#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Open the data-entry dialog; handled by the screen itself.
    Add {
        table: Table,
    },
    /// Dialog contents ready to be written.
    Save(FormSubmission),
    Set {
        table: Table,
        id: i32,
        field: String,
        value: String,
    },
    MarkPassed {
        id: i32,
    },
    MarkPaid {
        id: i32,
    },
    Delete {
        table: Table,
        id: i32,
    },
    Names {
        table: Table,
        prefix: Option<String>,
    },
    Export {
        path: String,
    },
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

fn parse_id(s: Option<&&str>) -> Option<i32> {
    s.and_then(|s| s.trim_start_matches('#').parse::<i32>().ok())
}

fn parse_table(s: Option<&&str>) -> Option<Table> {
    s.and_then(|s| s.parse::<Table>().ok())
}

impl FromStr for AppCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(AppCommand::Unknown("".to_string()));
        }

        match parts[0] {
            "add" | "new" => match parse_table(parts.get(1)) {
                Some(table) => Ok(AppCommand::Add { table }),
                None => Ok(AppCommand::Unknown(
                    "usage: add game|referee|stadium|team|league|category|city".to_string(),
                )),
            },
            "set" | "edit" => {
                match (parse_table(parts.get(1)), parse_id(parts.get(2)), parts.get(3)) {
                    (Some(table), Some(id), Some(field)) => Ok(AppCommand::Set {
                        table,
                        id,
                        field: field.to_string(),
                        value: parts[4..].join(" "),
                    }),
                    _ => Ok(AppCommand::Unknown(
                        "usage: set <table> <id> <field> <value>".to_string(),
                    )),
                }
            }
            "passed" | "pass" => match parse_id(parts.get(1)) {
                Some(id) => Ok(AppCommand::MarkPassed { id }),
                None => Ok(AppCommand::Unknown("usage: passed <game id>".to_string())),
            },
            "paid" | "pay" => match parse_id(parts.get(1)) {
                Some(id) => Ok(AppCommand::MarkPaid { id }),
                None => Ok(AppCommand::Unknown("usage: paid <game id>".to_string())),
            },
            "delete" | "rm" => match (parse_table(parts.get(1)), parse_id(parts.get(2))) {
                (Some(table), Some(id)) => Ok(AppCommand::Delete { table, id }),
                _ => Ok(AppCommand::Unknown("usage: delete <table> <id>".to_string())),
            },
            "names" | "lookup" => match parse_table(parts.get(1)) {
                Some(Table::Games) | None => Ok(AppCommand::Unknown(
                    "usage: names referee|stadium|team|league|category|city [prefix]".to_string(),
                )),
                Some(table) => {
                    let prefix = parts[2..].join(" ");
                    Ok(AppCommand::Names {
                        table,
                        prefix: (!prefix.is_empty()).then_some(prefix),
                    })
                }
            },
            "export" => match parts.get(1) {
                Some(path) => Ok(AppCommand::Export {
                    path: path.to_string(),
                }),
                None => Ok(AppCommand::Unknown("usage: export <path.json>".to_string())),
            },
            "refresh" | "r" => Ok(AppCommand::Refresh),
            "help" | "?" => Ok(AppCommand::Help),
            "quit" | "exit" => Ok(AppCommand::Quit),
            other => Ok(AppCommand::Unknown(format!("unknown command: {other}"))),
        }
    }
}
