//! # Game Session
//!
//! Chains possessions into a game: keeps the score, the streak and the mode clock,
//! and deals a fresh scenario after every basket.
//!
//! ## Lifecycle
//! ```text
//! new(seed) -> Playing --score--> next possession (streak + 1) --> ...
//!                 |
//!                 +--lockup / time up / clock expired--> Over(GameOver)
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::GameConfig;
use crate::error::IllegalAction;
use crate::possession::{Action, FailureReason, Possession, PossessionEvent, PossessionMachine};
use crate::scenario::generate_scenario;
use crate::unit::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Keep scoring; the first failed possession ends the game.
    StreakAttack,
    /// Score as much as possible before the countdown runs out.
    TimeAttack,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::StreakAttack, GameMode::TimeAttack];

    pub fn label(self) -> &'static str {
        match self {
            GameMode::StreakAttack => "streak-attack",
            GameMode::TimeAttack => "time-attack",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "streak-attack" | "streak" => Ok(GameMode::StreakAttack),
            "time-attack" | "time" => Ok(GameMode::TimeAttack),
            other => Err(format!("Unknown game mode: {}", other)),
        }
    }
}

/// Final tally handed to the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub score: u32,
    pub streak: u32,
    pub mode: GameMode,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Over(GameOver),
}

/// Serializable view of a session for front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: GameMode,
    pub score: u32,
    pub streak: u32,
    pub high_score: u32,
    pub time_left: Option<u32>,
    pub possessions: u32,
    pub status: GameStatus,
    pub possession: Possession,
    pub can_undo: bool,
}

pub struct GameSession {
    config: GameConfig,
    mode: GameMode,
    score: u32,
    streak: u32,
    high_score: u32,
    time_left: Option<u32>,
    possessions: u32,
    status: GameStatus,
    machine: PossessionMachine,
    rng: ChaCha8Rng,
}

impl GameSession {
    /// Start a game; the seed fixes every scenario the game will deal.
    pub fn new(config: GameConfig, mode: GameMode, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let roster = generate_scenario(&mut rng, &config.court);
        Self::start(config, mode, rng, roster)
    }

    /// Start a game on a prepared first layout; later possessions are generated.
    pub fn from_roster(config: GameConfig, mode: GameMode, seed: u64, roster: Roster) -> Self {
        Self::start(config, mode, ChaCha8Rng::seed_from_u64(seed), roster)
    }

    fn start(config: GameConfig, mode: GameMode, rng: ChaCha8Rng, roster: Roster) -> Self {
        let (time_left, message) = match mode {
            GameMode::TimeAttack => {
                let secs = config.rules.time_attack_seconds;
                (Some(secs), format!("Go! Score as much as possible in {} seconds!", secs))
            }
            GameMode::StreakAttack => (None, "Execute precisely. One mistake ends the streak.".to_string()),
        };
        log::info!("New {} game", mode);
        let machine = PossessionMachine::new(Possession::new(roster, 0).with_message(message));
        Self {
            config,
            mode,
            score: 0,
            streak: 0,
            high_score: 0,
            time_left,
            possessions: 1,
            status: GameStatus::Playing,
            machine,
            rng,
        }
    }

    /// Carry a stored best score into this game.
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = self.high_score.max(high_score);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn time_left(&self) -> Option<u32> {
        self.time_left
    }

    /// Possessions dealt so far, the current one included.
    pub fn possessions(&self) -> u32 {
        self.possessions
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Over(_))
    }

    pub fn game_over(&self) -> Option<GameOver> {
        match self.status {
            GameStatus::Over(over) => Some(over),
            GameStatus::Playing => None,
        }
    }

    pub fn possession(&self) -> &Possession {
        self.machine.possession()
    }

    pub fn can_undo(&self) -> bool {
        self.machine.can_undo()
    }

    pub fn apply(&mut self, action: Action) -> Result<PossessionEvent, IllegalAction> {
        if self.is_over() {
            return Err(IllegalAction::PossessionOver);
        }
        let event = self.machine.apply(action, &self.config)?;
        match event {
            PossessionEvent::Scored { points, .. } => {
                self.score += points;
                self.streak += 1;
                self.high_score = self.high_score.max(self.score);
                self.next_possession();
            }
            PossessionEvent::Failed(reason) => self.finish(reason),
            _ => {}
        }
        Ok(event)
    }

    /// Tick the time-attack countdown. Returns the summary when this tick ends the game.
    pub fn advance_clock(&mut self, seconds: u32) -> Option<GameOver> {
        if self.is_over() {
            return None;
        }
        let left = self.time_left.as_mut()?;
        *left = left.saturating_sub(seconds);
        if *left > 0 {
            return None;
        }
        self.machine.force_fail(FailureReason::ClockExpired);
        self.finish(FailureReason::ClockExpired);
        self.game_over()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            score: self.score,
            streak: self.streak,
            high_score: self.high_score,
            time_left: self.time_left,
            possessions: self.possessions,
            status: self.status,
            possession: self.possession().clone(),
            can_undo: self.can_undo(),
        }
    }

    fn next_possession(&mut self) {
        let roster = generate_scenario(&mut self.rng, &self.config.court);
        let message = match self.mode {
            GameMode::TimeAttack => "Bucket! Keep moving!".to_string(),
            GameMode::StreakAttack => format!("Streak: {}. Keep it alive!", self.streak),
        };
        self.possessions += 1;
        log::debug!("Possession {} dealt at streak {}", self.possessions, self.streak);
        self.machine = PossessionMachine::new(Possession::new(roster, self.streak).with_message(message));
    }

    fn finish(&mut self, reason: FailureReason) {
        let over = GameOver { score: self.score, streak: self.streak, mode: self.mode, reason };
        log::info!("Game over ({}): score {} after {} possessions", reason, self.score, self.possessions);
        self.status = GameStatus::Over(over);
    }
}
