use thiserror::Error;

use crate::court::Cell;
use crate::possession::Phase;
use crate::unit::UnitId;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid court: {0}")]
    InvalidCourt(String),

    #[error("Invalid rules: {0}")]
    InvalidRules(String),
}

/// A unit snapshot that breaks a possession invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Invalid team size: expected {expected} offense and defense, found {offense}/{defense}")]
    TeamSize { expected: usize, offense: usize, defense: usize },

    #[error("Duplicate unit id: {0}")]
    DuplicateId(UnitId),

    #[error("Cell {cell} is occupied by both {first} and {second}")]
    Overlap { cell: Cell, first: UnitId, second: UnitId },

    #[error("Unit {unit} stands on unplayable cell {cell}")]
    Unplayable { unit: UnitId, cell: Cell },

    #[error("Expected exactly one ball carrier, found {0}")]
    BallCount(usize),

    #[error("Defender {0} holds the ball")]
    DefenderWithBall(UnitId),
}

/// A rejected possession action. The snapshot is left untouched; the message is shown inline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("Move support players first!")]
    SupportsFirst,

    #[error("{0} already moved this turn")]
    AlreadyMoved(UnitId),

    #[error("{unit} cannot move during {phase}")]
    NotMovable { unit: UnitId, phase: Phase },

    #[error("Unknown unit: {0}")]
    UnknownUnit(UnitId),

    #[error("{unit} cannot move to {to}")]
    InvalidDestination { unit: UnitId, to: Cell },

    #[error("Pass lane denied by defense!")]
    PassDenied,

    #[error("{0} cannot receive a pass")]
    NotAReceiver(UnitId),

    #[error("Cannot {action} during {phase}")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Undo already used this turn")]
    UndoUsed,

    #[error("Possession is over")]
    PossessionOver,
}

#[derive(Error, Debug)]
pub enum HintError {
    #[error("Hint source unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
