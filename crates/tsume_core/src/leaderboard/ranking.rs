use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::LeaderboardError;
use crate::session::GameMode;

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub name: String,
    pub score: u32,
    pub mode: GameMode,
    /// Stored as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
}

/// Trim, upper-case and cut a player name to `max_len` characters.
pub fn normalize_name(raw: &str, max_len: usize) -> Option<String> {
    let name: String = raw.trim().to_uppercase().chars().take(max_len).collect();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

impl Ranking {
    pub fn new(
        name: &str,
        score: i64,
        mode: GameMode,
        date: DateTime<Utc>,
        max_name_len: usize,
    ) -> Result<Self, LeaderboardError> {
        let name = normalize_name(name, max_name_len).ok_or(LeaderboardError::InvalidName)?;
        let score = u32::try_from(score).map_err(|_| LeaderboardError::InvalidScore(score))?;
        Ok(Self { name, score, mode, date })
    }

    /// `MM/DD HH:MM`, the compact stamp shown in tables.
    pub fn short_date(&self) -> String {
        self.date.format("%m/%d %H:%M").to_string()
    }
}

/// Per-mode tables, best score first, each capped at `capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    rankings: Vec<Ranking>,
    capacity: usize,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self { rankings: Vec::new(), capacity }
    }

    pub fn from_rankings(rankings: Vec<Ranking>, capacity: usize) -> Self {
        let mut board = Self { rankings, capacity };
        board.settle();
        board
    }

    pub fn insert(&mut self, ranking: Ranking) {
        self.rankings.push(ranking);
        self.settle();
    }

    /// Rankings for one mode, best first. Equal scores keep arrival order.
    pub fn top(&self, mode: GameMode) -> Vec<&Ranking> {
        self.rankings.iter().filter(|r| r.mode == mode).collect()
    }

    /// 1-based position `score` would take in `mode`, if it makes the table.
    pub fn position_for(&self, mode: GameMode, score: u32) -> Option<usize> {
        let ahead = self.rankings.iter().filter(|r| r.mode == mode && r.score >= score).count();
        (ahead < self.capacity).then_some(ahead + 1)
    }

    pub fn rankings(&self) -> &[Ranking] {
        &self.rankings
    }

    fn settle(&mut self) {
        // stable: ties stay in arrival order
        self.rankings.sort_by(|a, b| b.score.cmp(&a.score));
        let capacity = self.capacity;
        let mut kept = [0usize; GameMode::ALL.len()];
        self.rankings.retain(|r| {
            let slot = &mut kept[GameMode::ALL.iter().position(|m| *m == r.mode).unwrap_or(0)];
            *slot += 1;
            *slot <= capacity
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn ranking(name: &str, score: i64, mode: GameMode) -> Ranking {
        Ranking::new(name, score, mode, at(1_700_000_000_000), 10).unwrap()
    }

    #[test]
    fn test_name_normalization() {
        let r = ranking("  michael jordan the goat ", 23, GameMode::StreakAttack);
        assert_eq!(r.name, "MICHAEL JO");
        assert_eq!(normalize_name("   ", 10), None);
        assert_eq!(normalize_name("kobe", 10).as_deref(), Some("KOBE"));
    }

    #[test]
    fn test_rejects_bad_input() {
        let now = at(0);
        assert!(matches!(Ranking::new("  ", 5, GameMode::TimeAttack, now, 10), Err(LeaderboardError::InvalidName)));
        assert!(matches!(
            Ranking::new("AI", -1, GameMode::TimeAttack, now, 10),
            Err(LeaderboardError::InvalidScore(-1))
        ));
        assert!(Ranking::new("AI", 0, GameMode::TimeAttack, now, 10).is_ok());
    }

    #[test]
    fn test_tables_sorted_and_split_by_mode() {
        let mut board = Leaderboard::new(100);
        board.insert(ranking("a", 4, GameMode::StreakAttack));
        board.insert(ranking("b", 9, GameMode::StreakAttack));
        board.insert(ranking("c", 7, GameMode::TimeAttack));
        board.insert(ranking("d", 4, GameMode::StreakAttack));

        let streak: Vec<&str> = board.top(GameMode::StreakAttack).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(streak, vec!["B", "A", "D"]);
        assert_eq!(board.top(GameMode::TimeAttack).len(), 1);
    }

    #[test]
    fn test_capacity_is_per_mode() {
        let mut board = Leaderboard::new(3);
        for score in 0..5 {
            board.insert(ranking("s", score, GameMode::StreakAttack));
        }
        board.insert(ranking("t", 1, GameMode::TimeAttack));

        let scores: Vec<u32> = board.top(GameMode::StreakAttack).iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![4, 3, 2]);
        assert_eq!(board.top(GameMode::TimeAttack).len(), 1);
        assert_eq!(board.position_for(GameMode::StreakAttack, 1), None);
        assert_eq!(board.position_for(GameMode::StreakAttack, 5), Some(1));
    }

    #[test]
    fn test_json_shape() {
        let r = ranking("ai", 12, GameMode::TimeAttack);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["mode"], "time-attack");
        assert_eq!(json["date"], 1_700_000_000_000i64);
        assert_eq!(r.short_date().len(), "11/14 22:13".len());
    }
}
