pub mod connection;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod repository;
pub mod table;

pub use connection::establish_connection;
pub use error::StorageError;
pub use gateway::{CellValue, RowData, TableGateway};
pub use table::Table;
