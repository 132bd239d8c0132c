//! Legality checks for the three offensive actions.
//!
//! Every check reads a roster snapshot and returns a verdict; none of them mutate
//! state or fail out of band.
//!
//! ## Evaluation
//! ```text
//! move  : bounds -> reserved row -> one step -> destination empty
//! pass  : receiver covered -> adjacent (corner shading) | straight/diagonal lane
//! shot  : ball -> arc (contest) -> basket (dunk) -> layup (rim) -> too far
//! ```

mod movement;
mod passing;
mod scoring;

pub use movement::is_valid_move;
pub use passing::{can_pass_to_teammate, open_passing_targets, path_clear};
pub use scoring::{can_score, MissReason, ShotKind, ShotOutcome};
