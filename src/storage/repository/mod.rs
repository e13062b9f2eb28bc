pub mod directory_repo;
pub mod game_repo;
pub mod referee_repo;
pub mod stadium_repo;

pub use directory_repo::{DbNameResolver, DirectoryRepository};
pub use game_repo::GameRepository;
pub use referee_repo::RefereeRepository;
pub use stadium_repo::StadiumRepository;
