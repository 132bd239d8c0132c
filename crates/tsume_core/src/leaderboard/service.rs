use chrono::{DateTime, Utc};
use std::path::PathBuf;

use super::error::LeaderboardError;
use super::ranking::{Leaderboard, Ranking};
use super::store::LocalRecords;
use crate::config::RuleConfig;
use crate::session::GameMode;

/// Remote ranking backend.
pub trait RankingService {
    /// Every stored ranking, any mode.
    fn fetch(&self) -> Result<Vec<Ranking>, LeaderboardError>;

    fn submit(&self, ranking: &Ranking) -> Result<(), LeaderboardError>;
}

/// Backend for offline play: every call fails, so the board runs on local records.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineService;

impl RankingService for OfflineService {
    fn fetch(&self) -> Result<Vec<Ranking>, LeaderboardError> {
        Err(LeaderboardError::Remote("offline".to_string()))
    }

    fn submit(&self, _ranking: &Ranking) -> Result<(), LeaderboardError> {
        Err(LeaderboardError::Remote("offline".to_string()))
    }
}

/// Leaderboard front: talks to the service and falls back to local records.
///
/// Service failures never escape; they are logged and the local cache is used.
pub struct RankingBoard<S: RankingService> {
    service: S,
    records: LocalRecords,
    board: Leaderboard,
    path: Option<PathBuf>,
    capacity: usize,
    name_len: usize,
}

impl<S: RankingService> RankingBoard<S> {
    pub fn new(service: S, records: LocalRecords, rules: &RuleConfig) -> Self {
        let board = Leaderboard::from_rankings(records.rankings.clone(), rules.leaderboard_capacity);
        Self {
            service,
            records,
            board,
            path: None,
            capacity: rules.leaderboard_capacity,
            name_len: rules.ranking_name_len,
        }
    }

    /// Persist the local cache to `path` after every change.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn records(&self) -> &LocalRecords {
        &self.records
    }

    pub fn high_score(&self) -> u32 {
        self.records.high_score
    }

    pub fn top(&self, mode: GameMode) -> Vec<&Ranking> {
        self.board.top(mode)
    }

    /// 1-based place `score` would take in the cached `mode` table, if it makes it.
    pub fn position_for(&self, mode: GameMode, score: u32) -> Option<usize> {
        self.board.position_for(mode, score)
    }

    /// Pull the remote rankings into the cache; on failure keep what is cached.
    pub fn refresh(&mut self) {
        match self.service.fetch() {
            Ok(rankings) => {
                log::debug!("Fetched {} rankings", rankings.len());
                self.replace(rankings);
            }
            Err(err) => log::warn!("Ranking fetch failed, using local records: {}", err),
        }
    }

    /// Record a finished game.
    ///
    /// Only invalid input is an error; service trouble falls back to the local table.
    pub fn submit(&mut self, name: &str, score: i64, mode: GameMode) -> Result<Ranking, LeaderboardError> {
        self.submit_at(name, score, mode, Utc::now())
    }

    pub fn submit_at(
        &mut self,
        name: &str,
        score: i64,
        mode: GameMode,
        date: DateTime<Utc>,
    ) -> Result<Ranking, LeaderboardError> {
        let ranking = Ranking::new(name, score, mode, date, self.name_len)?;
        self.records.record_high_score(ranking.score);

        let remote = self.service.submit(&ranking).and_then(|_| self.service.fetch());
        match remote {
            Ok(rankings) => self.replace(rankings),
            Err(err) => {
                log::warn!("Ranking submit failed, keeping it locally: {}", err);
                self.board.insert(ranking.clone());
                self.sync_records();
            }
        }
        log::info!("Ranked {} with {} ({})", ranking.name, ranking.score, mode);
        Ok(ranking)
    }

    /// Raise the stored best score and persist it.
    pub fn record_high_score(&mut self, score: u32) {
        if self.records.record_high_score(score) {
            self.persist();
        }
    }

    fn replace(&mut self, rankings: Vec<Ranking>) {
        self.board = Leaderboard::from_rankings(rankings, self.capacity);
        self.sync_records();
    }

    fn sync_records(&mut self) {
        self.records.rankings = self.board.rankings().to_vec();
        self.persist();
    }

    fn persist(&self) {
        let Some(path) = &self.path else { return };
        if let Err(err) = self.records.save(path) {
            log::warn!("Could not write local records to {:?}: {}", path, err);
        }
    }
}
