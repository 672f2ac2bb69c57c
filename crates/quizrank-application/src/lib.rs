pub mod leaderboard_usecase;

pub use leaderboard_usecase::LeaderboardUseCase;
