pub mod model;
pub mod service;

pub use model::{GameStatus, GameView, PaymentSummary, RefereeView, StadiumView};
pub use service::ScheduleService;
