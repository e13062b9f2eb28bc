use sea_orm::DbErr;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("query build error: {0}")]
    Query(String),
    #[error("table {table} has no column {column:?}")]
    UnknownColumn { table: &'static str, column: String },
    #[error("refusing to {0} without conditions")]
    Unbounded(&'static str),
    #[error("nothing to write")]
    EmptyRow,
    #[error("{table} #{id} not found")]
    NotFound { table: &'static str, id: i32 },
}
