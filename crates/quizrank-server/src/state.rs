use quizrank_application::LeaderboardUseCase;
use quizrank_core::config::LeaderboardConfig;

pub struct AppState {
    pub config: LeaderboardConfig,
    pub leaderboard: LeaderboardUseCase,
}
