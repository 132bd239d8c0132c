//! # tsume_core - Deterministic Half-Court Basketball Puzzle Engine
//!
//! Rules, defense AI and possession flow for a turn-based 5-on-5 half-court
//! puzzle, with a JSON API for front ends.
//!
//! ## Features
//! - Pure rule checks over unit snapshots (move, pass, shot)
//! - Deterministic defense turns (same board + streak = same result)
//! - Seeded scenario generation
//! - Possession state machine with one undo per turn
//! - Streak-attack and time-attack sessions with local-first leaderboards

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally in tests and configs
#![allow(clippy::field_reassign_with_default)]
// Possession events carry full snapshots
#![allow(clippy::large_enum_variant)]

pub mod api;
pub mod coach;
pub mod config;
pub mod court;
pub mod defense;
pub mod error;
pub mod leaderboard;
pub mod possession;
pub mod rules;
pub mod scenario;
pub mod session;
pub mod strategy;
pub mod unit;

#[cfg(test)]
mod proptests;

// Re-export main API
pub use api::{evaluate_json, RulesRequest, RulesResponse};
pub use config::{GameConfig, RuleConfig};
pub use court::{Cell, CourtConfig};
pub use error::{ConfigError, HintError, IllegalAction, Result, RosterError};

// Rules and defense
pub use defense::{apply_defense_turn, plan_defense_turn, DefenderMove, DefenseDecision};
pub use rules::{can_pass_to_teammate, can_score, is_valid_move, MissReason, ShotKind, ShotOutcome};
pub use scenario::{generate_scenario, generate_seeded, opening_scenario};
pub use strategy::{strategy_highlights, Strategy};
pub use unit::{Role, Roster, Team, Unit, UnitId};

// Game flow
pub use coach::{coach_hint, HintRequest, HintSource, PlaybookCoach};
pub use possession::{Action, FailureReason, Phase, Possession, PossessionEvent, PossessionMachine, PossessionStatus};
pub use session::{GameMode, GameOver, GameSession, GameStatus, SessionSnapshot};

// Leaderboard
pub use leaderboard::{LeaderboardError, LocalRecords, OfflineService, Ranking, RankingBoard, RankingService};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = api::SCHEMA_VERSION;
