//! Turn/phase state machine for one possession.
//!
//! ## Turn flow
//! ```text
//! off-ball movement     4 supports move or stay, one move each
//!        |
//! ball-carrier movement move or stay; stepping onto the basket dunks
//!        |
//! action choice         shoot -> score | blocked (stay here)
//!        |              pass  -> pick a target (cancel returns)
//! pass target           pass completes -> turn limit? -> defense turn -> next turn
//! ```
//!
//! [`Possession`] is an immutable snapshot: [`Possession::apply`] returns a new one.
//! [`PossessionMachine`] commits snapshots and owns the one-deep undo.

mod machine;
mod phase;
mod state;

pub use machine::PossessionMachine;
pub use phase::Phase;
pub use state::{is_locked_up, Action, FailureReason, Possession, PossessionEvent, PossessionStatus, Step};
