use crate::app_state::AppEvent;
use crate::commands::{AppCommand, HELP};
use crate::form::{FormError, FormSubmission};
use crate::schedule::{PaymentSummary, ScheduleService};
use crate::storage::repository::{DbNameResolver, DirectoryRepository, GameRepository};
use crate::storage::{CellValue, StorageError, Table, TableGateway};
use log::{error, info, warn};
use sea_orm::DatabaseConnection;
use std::path::Path;
use tokio::sync::mpsc;

/// Pushes fresh lists, lookup names and the payment summary to the screen.
pub async fn refresh_ui(db: &DatabaseConnection, tx: &mpsc::UnboundedSender<AppEvent>) {
    match ScheduleService::game_views(db).await {
        Ok(games) => {
            let _ = tx.send(AppEvent::Summary(PaymentSummary::from_games(&games)));
            let _ = tx.send(AppEvent::Games(games));
        }
        Err(e) => warn!("refresh games failed: {}", e),
    }

    if let Ok(refs) = ScheduleService::referee_views(db).await {
        let _ = tx.send(AppEvent::Referees(refs));
    }
    if let Ok(stadiums) = ScheduleService::stadium_views(db).await {
        let _ = tx.send(AppEvent::Stadiums(stadiums));
    }

    for table in Table::lookups() {
        if let Ok(names) = DirectoryRepository::names(db, table).await {
            let _ = tx.send(AppEvent::Names(table, names));
        }
    }
}

/// Writes a submission; returns the affected id.
async fn save(db: &DatabaseConnection, sub: &FormSubmission) -> Result<i32, FormError> {
    let resolver = DbNameResolver::new(db);
    let row = sub.into_row(&resolver).await?;
    match sub.target {
        None => Ok(TableGateway::insert(db, sub.table, &row).await?),
        Some(id) => {
            let n = TableGateway::update(db, sub.table, &row, &[("id", CellValue::from(id))]).await?;
            if n == 0 {
                return Err(StorageError::NotFound {
                    table: sub.table.name(),
                    id,
                }
                .into());
            }
            Ok(id)
        }
    }
}

async fn delete(db: &DatabaseConnection, table: Table, id: i32) -> Result<u64, StorageError> {
    if table == Table::Games {
        return Ok(GameRepository::delete(db, id).await?);
    }
    TableGateway::delete(db, table, &[("id", CellValue::from(id))]).await
}

fn game_not_found(id: i32) -> String {
    format!("✗ game #{} not found", id)
}

/// Executes one command from the screen. Mutations are followed by a refresh.
pub async fn handle_command(
    cmd: AppCommand,
    db: &DatabaseConnection,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let mutated = match cmd {
        AppCommand::Save(sub) => match save(db, &sub).await {
            Ok(id) => {
                info!("saved {} #{}", sub.table, id);
                let _ = tx.send(AppEvent::FormSaved(format!("✓ {} #{} saved", sub.table, id)));
                true
            }
            Err(e) => {
                warn!("save into {} rejected: {}", sub.table, e);
                let _ = tx.send(AppEvent::FormRejected(e.to_string()));
                false
            }
        },
        AppCommand::Set {
            table,
            id,
            field,
            value,
        } => {
            let result = match FormSubmission::single(table, id, &field, &value) {
                Ok(sub) => save(db, &sub).await,
                Err(e) => Err(e.into()),
            };
            match result {
                Ok(_) => {
                    info!("updated {} #{} {}", table, id, field);
                    let _ = tx.send(AppEvent::Message(format!("✓ {} #{} {} updated", table, id, field)));
                    true
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::Error(format!("✗ {}", e)));
                    false
                }
            }
        }
        AppCommand::MarkPassed { id } => match GameRepository::mark_passed(db, id).await {
            Ok(0) => {
                let _ = tx.send(AppEvent::Error(game_not_found(id)));
                false
            }
            Ok(_) => {
                let _ = tx.send(AppEvent::Message(format!("✓ game #{} marked passed", id)));
                true
            }
            Err(e) => {
                error!("mark passed #{} failed: {}", id, e);
                let _ = tx.send(AppEvent::Error(format!("✗ {}", e)));
                false
            }
        },
        AppCommand::MarkPaid { id } => match GameRepository::mark_paid(db, id).await {
            Ok(0) => {
                let _ = tx.send(AppEvent::Error(game_not_found(id)));
                false
            }
            Ok(_) => {
                let _ = tx.send(AppEvent::Message(format!("✓ game #{} marked paid", id)));
                true
            }
            Err(e) => {
                error!("mark paid #{} failed: {}", id, e);
                let _ = tx.send(AppEvent::Error(format!("✗ {}", e)));
                false
            }
        },
        AppCommand::Delete { table, id } => {
            let label = match table {
                Table::Games => None,
                _ => DirectoryRepository::name_of(db, table, id).await.ok().flatten(),
            };
            match delete(db, table, id).await {
                Ok(0) => {
                    let _ = tx.send(AppEvent::Error(format!("✗ {} #{} not found", table, id)));
                    false
                }
                Ok(_) => {
                    info!("deleted {} #{}", table, id);
                    let shown = label.map(|n| format!(" ({})", n)).unwrap_or_default();
                    let _ = tx.send(AppEvent::Message(format!("✓ {} #{}{} deleted", table, id, shown)));
                    true
                }
                Err(e) => {
                    warn!("delete {} #{} refused: {}", table, id, e);
                    let _ = tx.send(AppEvent::Error(format!(
                        "✗ cannot delete {} #{} (still referenced?): {}",
                        table, id, e
                    )));
                    false
                }
            }
        }
        AppCommand::Names { table, prefix } => {
            match DirectoryRepository::names(db, table).await {
                Ok(names) => {
                    let wanted = prefix.map(|p| p.to_lowercase());
                    let shown: Vec<String> = names
                        .into_iter()
                        .filter(|n| {
                            wanted
                                .as_deref()
                                .map_or(true, |p| n.to_lowercase().starts_with(p))
                        })
                        .collect();
                    let _ = tx.send(AppEvent::Message(format!(
                        "{} ({}): {}",
                        table,
                        shown.len(),
                        shown.join(", ")
                    )));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::Error(format!("✗ {}", e)));
                }
            }
            false
        }
        AppCommand::Export { path } => {
            match ScheduleService::export_games(db, Path::new(&path)).await {
                Ok(n) => {
                    let _ = tx.send(AppEvent::Message(format!("✓ exported {} games to {}", n, path)));
                }
                Err(e) => {
                    error!("export to {} failed: {:#}", path, e);
                    let _ = tx.send(AppEvent::Error(format!("✗ export failed: {:#}", e)));
                }
            }
            false
        }
        AppCommand::Refresh => true,
        AppCommand::Help => {
            let _ = tx.send(AppEvent::Message(HELP.to_string()));
            false
        }
        AppCommand::Add { table } => {
            // the screen opens the dialog itself; nothing to do here
            let _ = tx.send(AppEvent::Log(format!("add {} requested", table)));
            false
        }
        AppCommand::Quit => false,
        AppCommand::Unknown(msg) => {
            let _ = tx.send(AppEvent::Error(format!("⚠ {}", msg)));
            false
        }
    };

    if mutated {
        refresh_ui(db, tx).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::service::tests::{insert, seeded};
    use crate::schedule::GameStatus;

    fn drain(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> Vec<AppEvent> {
        let mut out = Vec::new();
        while let Ok(e) = rx.try_recv() {
            out.push(e);
        }
        out
    }

    fn messages(events: &[AppEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Message(m) | AppEvent::Error(m) | AppEvent::FormSaved(m) | AppEvent::FormRejected(m) => {
                    Some(m.clone())
                }
                _ => None,
            })
            .collect()
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    async fn game_inputs_saved(db: &DatabaseConnection, tx: &mpsc::UnboundedSender<AppEvent>) {
        let inputs = strings(&[
            "Youth Cup", "12.05.24", "18:30", "Luzhniki", "Spartak", "2010", "dynamo", "",
            "Petrov Ivan", "Ivanova Anna", "", "", "1500", "", "",
        ]);
        let sub = FormSubmission::from_inputs(Table::Games, &inputs).unwrap();
        handle_command(AppCommand::Save(sub), db, tx).await;
    }

    #[tokio::test]
    async fn saving_a_game_form_resolves_names_and_refreshes() {
        let db = seeded().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        game_inputs_saved(&db, &tx).await;

        let events = drain(&mut rx);
        assert!(matches!(events.first(), Some(AppEvent::FormSaved(m)) if m.starts_with("✓ Games #1")));
        let games = events
            .iter()
            .find_map(|e| match e {
                AppEvent::Games(g) => Some(g.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].matchup(), "Spartak (2010) – Dynamo");
        assert_eq!(games[0].time_label(), "18:30");
        assert_eq!((games[0].year, games[0].month, games[0].day), (2024, 5, 12));
        assert_eq!(games[0].status, GameStatus::NotPassed);
        assert!(events.iter().any(|e| matches!(e, AppEvent::Names(Table::Referee, n) if n.len() == 2)));
    }

    #[tokio::test]
    async fn unknown_lookup_name_rejects_the_form() {
        let db = seeded().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sub = FormSubmission::from_inputs(
            Table::Stadium,
            &strings(&["Arena", "", "Kazan"]),
        )
        .unwrap();
        handle_command(AppCommand::Save(sub), &db, &tx).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], AppEvent::FormRejected(m) if m.contains("Kazan")));
        assert_eq!(ScheduleService::stadium_views(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn set_updates_one_field_and_validates_it() {
        let db = seeded().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        game_inputs_saved(&db, &tx).await;
        drain(&mut rx);

        let set = |field: &str, value: &str| AppCommand::Set {
            table: Table::Games,
            id: 1,
            field: field.to_string(),
            value: value.to_string(),
        };
        handle_command(set("payment", "2000"), &db, &tx).await;
        handle_command(set("time", "25:00"), &db, &tx).await;
        handle_command(set("colour", "red"), &db, &tx).await;

        let msgs = messages(&drain(&mut rx));
        assert_eq!(msgs[0], "✓ Games #1 payment updated");
        assert!(msgs[1].starts_with("✗ "));
        assert!(msgs[2].contains("colour"));
        let g = &ScheduleService::game_views(&db).await.unwrap()[0];
        assert_eq!(g.payment, Some(2000));
        assert_eq!(g.time, 1830);
    }

    #[tokio::test]
    async fn set_rejects_out_of_range_payment_and_keeps_games_readable() {
        let db = seeded().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        game_inputs_saved(&db, &tx).await;
        drain(&mut rx);

        for value in ["99999999999", "-500"] {
            handle_command(
                AppCommand::Set {
                    table: Table::Games,
                    id: 1,
                    field: "payment".into(),
                    value: value.into(),
                },
                &db,
                &tx,
            )
            .await;
        }

        let msgs = messages(&drain(&mut rx));
        assert_eq!(msgs.len(), 2);
        assert!(msgs.iter().all(|m| m.starts_with("✗ Payment")));
        let games = ScheduleService::game_views(&db).await.unwrap();
        assert_eq!(games[0].payment, Some(1500));
    }

    #[tokio::test]
    async fn set_on_missing_row_reports_not_found() {
        let db = seeded().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle_command(
            AppCommand::Set {
                table: Table::Team,
                id: 99,
                field: "name".into(),
                value: "Zenit".into(),
            },
            &db,
            &tx,
        )
        .await;
        let msgs = messages(&drain(&mut rx));
        assert_eq!(msgs, vec!["✗ Team #99 not found".to_string()]);
    }

    #[tokio::test]
    async fn mark_commands_drive_status() {
        let db = seeded().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        game_inputs_saved(&db, &tx).await;

        handle_command(AppCommand::MarkPassed { id: 1 }, &db, &tx).await;
        assert_eq!(
            ScheduleService::game_views(&db).await.unwrap()[0].status,
            GameStatus::Passed
        );
        handle_command(AppCommand::MarkPaid { id: 1 }, &db, &tx).await;
        assert_eq!(
            ScheduleService::game_views(&db).await.unwrap()[0].status,
            GameStatus::PayDone
        );

        drain(&mut rx);
        handle_command(AppCommand::MarkPaid { id: 42 }, &db, &tx).await;
        assert_eq!(messages(&drain(&mut rx)), vec![game_not_found(42)]);
    }

    #[tokio::test]
    async fn delete_refuses_referenced_rows() {
        let db = seeded().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        game_inputs_saved(&db, &tx).await;
        let spare = insert(&db, Table::Team, &[("name", "Zenit")]).await;
        drain(&mut rx);

        handle_command(AppCommand::Delete { table: Table::Team, id: 1 }, &db, &tx).await;
        handle_command(AppCommand::Delete { table: Table::Team, id: spare }, &db, &tx).await;
        handle_command(AppCommand::Delete { table: Table::Games, id: 1 }, &db, &tx).await;

        let msgs = messages(&drain(&mut rx));
        assert!(msgs[0].starts_with("✗ cannot delete Team #1"));
        assert_eq!(msgs[1], format!("✓ Team #{} (Zenit) deleted", spare));
        assert_eq!(msgs[2], "✓ Games #1 deleted");
        assert!(ScheduleService::game_views(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn names_filters_by_prefix() {
        let db = seeded().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle_command(
            AppCommand::Names {
                table: Table::Team,
                prefix: Some("SPA".into()),
            },
            &db,
            &tx,
        )
        .await;
        assert_eq!(messages(&drain(&mut rx)), vec!["Team (1): Spartak".to_string()]);
    }

    #[tokio::test]
    async fn help_and_unknown_reply_without_refresh() {
        let db = seeded().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle_command(AppCommand::Help, &db, &tx).await;
        handle_command(AppCommand::Unknown("unknown command: x".into()), &db, &tx).await;
        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert_eq!(messages(&events), vec![HELP.to_string(), "⚠ unknown command: x".to_string()]);
    }
}
