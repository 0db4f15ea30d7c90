pub mod game_repository;
pub mod state_repository;
