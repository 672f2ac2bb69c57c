pub mod config;
pub mod error;
pub mod identity;
pub mod leaderboard;

// Re-export common error type
pub use error::LeaderboardError;
