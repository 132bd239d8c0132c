//! Leaderboard boundary.
//!
//! Rankings live behind [`RankingService`]; [`RankingBoard`] degrades to the
//! [`LocalRecords`] JSON file whenever the service fails, so the game never blocks on it.

mod error;
mod ranking;
mod service;
mod store;

pub use error::LeaderboardError;
pub use ranking::{normalize_name, Leaderboard, Ranking};
pub use service::{OfflineService, RankingBoard, RankingService};
pub use store::LocalRecords;
