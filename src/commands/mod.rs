pub mod app_command;

pub use app_command::{AppCommand, HELP};
