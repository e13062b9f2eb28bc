use crate::form::NameResolver;
use crate::schedule::model::{format_name, NamePart};
use crate::storage::entity::referee::Model as RefereeModel;
use crate::storage::error::StorageError;
use crate::storage::gateway::{CellValue, TableGateway};
use crate::storage::repository::{GameRepository, RefereeRepository, StadiumRepository};
use crate::storage::table::Table;
use async_trait::async_trait;
use sea_orm::sea_query::Order;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;

/// Name-based access to the tables that other forms pick rows from.
pub struct DirectoryRepository;

fn referee_label(r: &RefereeModel) -> String {
    format_name(
        &r.first_name,
        &r.second_name,
        r.third_name.as_deref(),
        &[NamePart::Second, NamePart::First],
    )
}

impl DirectoryRepository {
    /// Display names ordered for a lookup popup.
    pub async fn names(db: &DatabaseConnection, table: Table) -> Result<Vec<String>, StorageError> {
        if table == Table::Referee {
            let refs = RefereeRepository::list_ordered(db).await?;
            return Ok(refs.iter().map(referee_label).collect());
        }
        let rows =
            TableGateway::take_many(db, &["name"], table, &[], &[("name", Order::Asc)]).await?;
        Ok(rows
            .into_iter()
            .filter_map(|mut r| match r.pop() {
                Some(CellValue::Text(s)) => Some(s),
                Some(CellValue::Int(v)) => Some(v.to_string()),
                _ => None,
            })
            .collect())
    }

    /// id → display name for the whole table.
    pub async fn name_map(
        db: &DatabaseConnection,
        table: Table,
    ) -> Result<HashMap<i32, String>, StorageError> {
        if table == Table::Referee {
            let refs = RefereeRepository::list_ordered(db).await?;
            return Ok(refs.iter().map(|r| (r.id, referee_label(r))).collect());
        }
        let rows = TableGateway::take_many(db, &["id", "name"], table, &[], &[]).await?;
        Ok(rows
            .into_iter()
            .filter_map(|r| match (r.first(), r.get(1)) {
                (Some(CellValue::Int(id)), Some(name)) => Some((*id as i32, name.to_string())),
                _ => None,
            })
            .collect())
    }

    pub async fn name_of(
        db: &DatabaseConnection,
        table: Table,
        id: i32,
    ) -> Result<Option<String>, StorageError> {
        if table == Table::Referee {
            return Ok(RefereeRepository::find(db, id).await?.as_ref().map(referee_label));
        }
        let row = TableGateway::take_one(db, &["name"], table, &[("id", CellValue::from(id))], &[])
            .await?;
        Ok(row.and_then(|mut r| r.pop()).filter(|v| !v.is_null()).map(|v| v.to_string()))
    }

    /// Exact match first, then a case-insensitive one; the lowest id wins ties.
    pub async fn id_of(
        db: &DatabaseConnection,
        table: Table,
        name: &str,
    ) -> Result<Option<i32>, StorageError> {
        let name = name.trim();
        if table != Table::Referee {
            let row = TableGateway::take_one(
                db,
                &["id"],
                table,
                &[("name", CellValue::from(name))],
                &[("id", Order::Asc)],
            )
            .await?;
            if let Some(id) = row.and_then(|r| r.first().and_then(CellValue::as_int)) {
                return Ok(Some(id as i32));
            }
        }

        let wanted = name.to_lowercase();
        let mut hits: Vec<i32> = if table == Table::Referee {
            let refs = RefereeRepository::list_ordered(db).await?;
            let labels: Vec<(i32, [String; 2])> = refs
                .iter()
                .map(|r| {
                    let full = format_name(
                        &r.first_name,
                        &r.second_name,
                        r.third_name.as_deref(),
                        &[NamePart::Second, NamePart::First, NamePart::Third],
                    );
                    (r.id, [referee_label(r), full])
                })
                .collect();
            let exact: Vec<i32> = labels
                .iter()
                .filter(|(_, l)| l.iter().any(|l| l == name))
                .map(|(id, _)| *id)
                .collect();
            if exact.is_empty() {
                labels
                    .iter()
                    .filter(|(_, l)| l.iter().any(|l| l.to_lowercase() == wanted))
                    .map(|(id, _)| *id)
                    .collect()
            } else {
                exact
            }
        } else {
            Self::name_map(db, table)
                .await?
                .into_iter()
                .filter(|(_, n)| n.to_lowercase() == wanted)
                .map(|(id, _)| id)
                .collect()
        };
        hits.sort_unstable();
        Ok(hits.first().copied())
    }

    pub async fn exists(db: &DatabaseConnection, table: Table, id: i32) -> Result<bool, StorageError> {
        Ok(match table {
            Table::Games => GameRepository::find(db, id).await?.is_some(),
            Table::Referee => RefereeRepository::find(db, id).await?.is_some(),
            Table::Stadium => StadiumRepository::find(db, id).await?.is_some(),
            _ => TableGateway::take_one(db, &["id"], table, &[("id", CellValue::from(id))], &[])
                .await?
                .is_some(),
        })
    }
}

/// Resolves lookup names against the live database.
pub struct DbNameResolver<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DbNameResolver<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NameResolver for DbNameResolver<'_> {
    async fn id_of(&self, table: Table, name: &str) -> Result<Option<i32>, StorageError> {
        DirectoryRepository::id_of(self.db, table, name).await
    }

    async fn exists(&self, table: Table, id: i32) -> Result<bool, StorageError> {
        DirectoryRepository::exists(self.db, table, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::establish_connection;
    use crate::storage::gateway::RowData;

    async fn seeded() -> DatabaseConnection {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        for (first, second) in [("Ivan", "Petrov"), ("Anna", "Ivanova"), ("Oleg", "Petrov")] {
            let mut row = RowData::new();
            row.set("first_name", first).set("second_name", second);
            TableGateway::insert(&db, Table::Referee, &row).await.unwrap();
        }
        for name in ["Zenit", "Dynamo"] {
            let mut row = RowData::new();
            row.set("name", name);
            TableGateway::insert(&db, Table::Team, &row).await.unwrap();
        }
        db
    }

    #[tokio::test]
    async fn referee_names_are_second_first_in_surname_order() {
        let db = seeded().await;
        let names = DirectoryRepository::names(&db, Table::Referee).await.unwrap();
        assert_eq!(names, vec!["Ivanova Anna", "Petrov Ivan", "Petrov Oleg"]);
    }

    #[tokio::test]
    async fn team_names_sorted_and_mapped() {
        let db = seeded().await;
        let names = DirectoryRepository::names(&db, Table::Team).await.unwrap();
        assert_eq!(names, vec!["Dynamo", "Zenit"]);

        let map = DirectoryRepository::name_map(&db, Table::Team).await.unwrap();
        assert_eq!(map.get(&1).map(String::as_str), Some("Zenit"));
        assert_eq!(
            DirectoryRepository::name_of(&db, Table::Team, 2).await.unwrap().as_deref(),
            Some("Dynamo")
        );
        assert_eq!(DirectoryRepository::name_of(&db, Table::Team, 9).await.unwrap(), None);
    }

    #[tokio::test]
    async fn id_lookup_is_case_insensitive() {
        let db = seeded().await;
        assert_eq!(DirectoryRepository::id_of(&db, Table::Team, "Dynamo").await.unwrap(), Some(2));
        assert_eq!(DirectoryRepository::id_of(&db, Table::Team, "dynamo").await.unwrap(), Some(2));
        assert_eq!(
            DirectoryRepository::id_of(&db, Table::Referee, "petrov oleg").await.unwrap(),
            Some(3)
        );
        assert_eq!(DirectoryRepository::id_of(&db, Table::Referee, "Sidorov").await.unwrap(), None);
    }

    async fn insert_names(db: &DatabaseConnection, table: Table, rows: &[&[(&str, &str)]]) {
        for cells in rows {
            let mut row = RowData::new();
            for (c, v) in cells.iter() {
                row.set(*c, *v);
            }
            TableGateway::insert(db, table, &row).await.unwrap();
        }
    }

    #[tokio::test]
    async fn exact_case_beats_folded_match_for_teams() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        insert_names(&db, Table::Team, &[&[("name", "dynamo")], &[("name", "Dynamo")]]).await;

        assert_eq!(DirectoryRepository::id_of(&db, Table::Team, "Dynamo").await.unwrap(), Some(2));
        assert_eq!(DirectoryRepository::id_of(&db, Table::Team, "dynamo").await.unwrap(), Some(1));
        assert_eq!(DirectoryRepository::id_of(&db, Table::Team, "DYNAMO").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn duplicate_referee_labels_resolve_to_lowest_id() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        insert_names(
            &db,
            Table::Referee,
            &[
                &[("first_name", "ivan"), ("second_name", "petrov")],
                &[("first_name", "Ivan"), ("second_name", "Petrov"), ("phone", "+7(912)345-67-89")],
                &[("first_name", "Ivan"), ("second_name", "Petrov")],
            ],
        )
        .await;

        assert_eq!(DirectoryRepository::id_of(&db, Table::Referee, "Petrov Ivan").await.unwrap(), Some(2));
        assert_eq!(DirectoryRepository::id_of(&db, Table::Referee, "PETROV IVAN").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn exists_checks_each_table_kind() {
        let db = seeded().await;
        assert!(DirectoryRepository::exists(&db, Table::Referee, 1).await.unwrap());
        assert!(DirectoryRepository::exists(&db, Table::Team, 2).await.unwrap());
        assert!(!DirectoryRepository::exists(&db, Table::Stadium, 1).await.unwrap());
        assert!(!DirectoryRepository::exists(&db, Table::Games, 1).await.unwrap());
    }

    #[tokio::test]
    async fn games_have_no_names() {
        let db = seeded().await;
        assert!(matches!(
            DirectoryRepository::names(&db, Table::Games).await,
            Err(StorageError::UnknownColumn { .. })
        ));
    }
}
