use serde::{Deserialize, Serialize};
use std::fmt;

/// Sub-phase of one offensive turn.
///
/// ```text
/// OffBallMovement -> BallCarrierMovement -> ActionChoice <-> PassTargetSelection
///        ^                                                         |
///        +------------------------ pass + defense -----------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    OffBallMovement,
    BallCarrierMovement,
    ActionChoice,
    PassTargetSelection,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::OffBallMovement => "off-ball movement",
            Phase::BallCarrierMovement => "ball-carrier movement",
            Phase::ActionChoice => "action choice",
            Phase::PassTargetSelection => "pass target selection",
        }
    }

    /// Transition table. Staying in the same phase is always allowed.
    pub fn allows(self, next: Phase) -> bool {
        use Phase::*;
        self == next
            || matches!(
                (self, next),
                (OffBallMovement, BallCarrierMovement)
                    | (BallCarrierMovement, ActionChoice)
                    | (ActionChoice, PassTargetSelection)
                    | (PassTargetSelection, ActionChoice)
                    | (PassTargetSelection, OffBallMovement)
            )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
