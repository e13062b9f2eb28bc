//! Generic row access: SQL built from a column → value mapping.
//!
//! Table and column names are checked against [`Table`] before a statement is
//! built, values are always bound as parameters.

use crate::storage::error::StorageError;
use crate::storage::table::Table;
use log::debug;
use sea_orm::sea_query::{Alias, Expr, Order, Query, SimpleExpr};
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryResult, Value};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Int(i64),
    Text(String),
}

impl CellValue {
    /// All-digit text becomes an integer, blank text becomes NULL.
    #[cfg(test)]
    pub fn coerce(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            CellValue::Null
        } else if raw.chars().all(|c| c.is_ascii_digit()) {
            raw.parse::<i64>()
                .map(CellValue::Int)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string()))
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    fn to_value(&self) -> Value {
        match self {
            CellValue::Null => Value::from(Option::<i64>::None),
            CellValue::Int(v) => Value::from(*v),
            CellValue::Text(s) => Value::from(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

/// Ordered column → value mapping for one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowData {
    cells: Vec<(String, CellValue)>,
}

impl RowData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column`, replacing an earlier value for the same column.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<CellValue>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column, value)),
        }
        self
    }

    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

pub type Condition<'a> = (&'a str, CellValue);

pub struct TableGateway;

impl TableGateway {
    /// First row matching `conditions`, or `None`.
    pub async fn take_one(
        db: &DatabaseConnection,
        columns: &[&str],
        table: Table,
        conditions: &[Condition<'_>],
        order: &[(&str, Order)],
    ) -> Result<Option<Vec<CellValue>>, StorageError> {
        let stmt = Self::select(columns, table, conditions, order, Some(1))?;
        let backend = db.get_database_backend();
        match db.query_one(backend.build(&stmt)).await? {
            Some(row) => Ok(Some(read_row(&row, columns.len())?)),
            None => Ok(None),
        }
    }

    pub async fn take_many(
        db: &DatabaseConnection,
        columns: &[&str],
        table: Table,
        conditions: &[Condition<'_>],
        order: &[(&str, Order)],
    ) -> Result<Vec<Vec<CellValue>>, StorageError> {
        let stmt = Self::select(columns, table, conditions, order, None)?;
        let backend = db.get_database_backend();
        let rows = db.query_all(backend.build(&stmt)).await?;
        rows.iter()
            .map(|row| read_row(row, columns.len()))
            .collect()
    }

    /// Inserts `row` and returns the new id.
    pub async fn insert(
        db: &DatabaseConnection,
        table: Table,
        row: &RowData,
    ) -> Result<i32, StorageError> {
        if row.is_empty() {
            return Err(StorageError::EmptyRow);
        }
        for column in row.columns() {
            check_column(table, column)?;
        }

        let mut stmt = Query::insert();
        stmt.into_table(Alias::new(table.name()))
            .columns(row.columns().map(Alias::new));
        stmt.values(row.iter().map(|(_, v)| SimpleExpr::from(v.to_value())))
            .map_err(|e| StorageError::Query(e.to_string()))?;

        let backend = db.get_database_backend();
        let built = backend.build(&stmt);
        debug!("insert {} cells: {}", row.len(), built);
        let res = db.execute(built).await?;
        Ok(res.last_insert_id() as i32)
    }

    pub async fn update(
        db: &DatabaseConnection,
        table: Table,
        row: &RowData,
        conditions: &[Condition<'_>],
    ) -> Result<u64, StorageError> {
        if row.is_empty() {
            return Err(StorageError::EmptyRow);
        }
        if conditions.is_empty() {
            return Err(StorageError::Unbounded("update"));
        }

        let mut stmt = Query::update();
        stmt.table(Alias::new(table.name()));
        for (column, value) in row.iter() {
            check_column(table, column)?;
            stmt.value(Alias::new(column), SimpleExpr::from(value.to_value()));
        }
        for cond in where_clause(table, conditions)? {
            stmt.and_where(cond);
        }

        let backend = db.get_database_backend();
        let built = backend.build(&stmt);
        debug!("update: {}", built);
        Ok(db.execute(built).await?.rows_affected())
    }

    pub async fn delete(
        db: &DatabaseConnection,
        table: Table,
        conditions: &[Condition<'_>],
    ) -> Result<u64, StorageError> {
        if conditions.is_empty() {
            return Err(StorageError::Unbounded("delete"));
        }

        let mut stmt = Query::delete();
        stmt.from_table(Alias::new(table.name()));
        for cond in where_clause(table, conditions)? {
            stmt.and_where(cond);
        }

        let backend = db.get_database_backend();
        let built = backend.build(&stmt);
        debug!("delete: {}", built);
        Ok(db.execute(built).await?.rows_affected())
    }

    fn select(
        columns: &[&str],
        table: Table,
        conditions: &[Condition<'_>],
        order: &[(&str, Order)],
        limit: Option<u64>,
    ) -> Result<sea_orm::sea_query::SelectStatement, StorageError> {
        let mut stmt = Query::select();
        stmt.from(Alias::new(table.name()));
        for column in columns {
            check_column(table, column)?;
            stmt.column(Alias::new(*column));
        }
        for cond in where_clause(table, conditions)? {
            stmt.and_where(cond);
        }
        for (column, dir) in order {
            check_column(table, column)?;
            stmt.order_by(Alias::new(*column), dir.clone());
        }
        if let Some(n) = limit {
            stmt.limit(n);
        }
        Ok(stmt)
    }
}

fn check_column(table: Table, column: &str) -> Result<(), StorageError> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(StorageError::UnknownColumn {
            table: table.name(),
            column: column.to_string(),
        })
    }
}

fn where_clause(
    table: Table,
    conditions: &[Condition<'_>],
) -> Result<Vec<SimpleExpr>, StorageError> {
    conditions
        .iter()
        .map(|(column, value)| {
            check_column(table, column)?;
            let col = Expr::col(Alias::new(*column));
            Ok(if value.is_null() {
                col.is_null()
            } else {
                col.eq(value.to_value())
            })
        })
        .collect()
}

fn read_row(row: &QueryResult, width: usize) -> Result<Vec<CellValue>, StorageError> {
    (0..width).map(|idx| read_cell(row, idx)).collect()
}

fn read_cell(row: &QueryResult, idx: usize) -> Result<CellValue, StorageError> {
    // SQLite values carry their own type; integers first, text otherwise
    if let Ok(v) = row.try_get_by_index::<Option<i64>>(idx) {
        return Ok(v.map(CellValue::Int).unwrap_or(CellValue::Null));
    }
    let v = row.try_get_by_index::<Option<String>>(idx)?;
    Ok(v.map(CellValue::Text).unwrap_or(CellValue::Null))
}
