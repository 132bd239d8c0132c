use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("Invalid name")]
    InvalidName,

    #[error("Invalid score: {0}")]
    InvalidScore(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Records parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ranking service unavailable: {0}")]
    Remote(String),
}

impl LeaderboardError {
    /// Whether falling back to the local records is worthwhile.
    pub fn is_recoverable(&self) -> bool {
        match self {
            LeaderboardError::Io(_) => true,
            LeaderboardError::Remote(_) => true,
            LeaderboardError::Json(_) => false,
            LeaderboardError::InvalidName => false,
            LeaderboardError::InvalidScore(_) => false,
        }
    }
}
