//! Coaching hints.
//!
//! Hint text comes from an outside [`HintSource`]; [`coach_hint`] never fails and
//! answers with a stock tip whenever the source does.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::court::Cell;
use crate::error::HintError;
use crate::possession::{Phase, Possession};
use crate::rules::{can_score, ShotOutcome};
use crate::unit::Unit;

/// Tip used when the source is unavailable.
pub const FALLBACK_HINT: &str = "Execute the Pick & Roll!";
/// Tip used when the source answers with nothing.
pub const EMPTY_HINT: &str = "Move to space the floor.";

/// Board state handed to a hint source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRequest {
    pub phase: Phase,
    pub turn: u32,
    pub max_turns: u32,
    pub basket: Cell,
    pub units: Vec<Unit>,
}

impl HintRequest {
    pub fn new(possession: &Possession, config: &GameConfig) -> Self {
        Self {
            phase: possession.phase(),
            turn: possession.turn(),
            max_turns: config.rules.max_turns,
            basket: config.court.basket,
            units: possession.roster().to_vec(),
        }
    }

    /// Plain-text prompt for language-model backends.
    pub fn prompt(&self) -> String {
        let units = serde_json::to_string(&self.units).unwrap_or_default();
        format!(
            "Coach, analyze this Tsume Basketball state:\n\
             - Phase: {}\n\
             - Turn: {}/{}\n\
             - Players: {}\n\
             - Goal: Score at {}.\n\n\
             Templates Available:\n\
             1. Pick & Roll: Screens the ball-carrier's defender.\n\
             2. Floor Spacing: Stretches the AI's Denial logic.\n\
             3. Backdoor Cut: Exploits tight denial.\n\n\
             Give 1 specific tactical tip (max 12 words) suggesting a strategy or movement.",
            self.phase,
            self.turn + 1,
            self.max_turns,
            units,
            self.basket
        )
    }
}

pub trait HintSource {
    fn hint(&self, request: &HintRequest) -> Result<String, HintError>;
}

impl<F> HintSource for F
where
    F: Fn(&HintRequest) -> Result<String, HintError>,
{
    fn hint(&self, request: &HintRequest) -> Result<String, HintError> {
        self(request)
    }
}

/// Offline source that reads the board with the rules engine.
#[derive(Debug, Clone, Default)]
pub struct PlaybookCoach {
    config: GameConfig,
}

impl PlaybookCoach {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }
}

impl HintSource for PlaybookCoach {
    fn hint(&self, request: &HintRequest) -> Result<String, HintError> {
        let Some(carrier) = request.units.iter().find(|u| u.has_ball) else {
            return Err(HintError::Unavailable("no ball carrier on the board".to_string()));
        };
        if let ShotOutcome::Made(kind) = can_score(carrier, &request.units, &self.config.court) {
            return Ok(format!("{} is open. Take the {}!", carrier.id, kind));
        }
        if let Some(target) = crate::rules::open_passing_targets(&request.units).first() {
            return Ok(format!("Swing it to {} and make the defense rotate.", target));
        }
        Ok(String::new())
    }
}

/// Ask `source` for a tip; falls back to stock text on error or blank answers.
pub fn coach_hint<H: HintSource + ?Sized>(source: &H, possession: &Possession, config: &GameConfig) -> String {
    let request = HintRequest::new(possession, config);
    match source.hint(&request) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => EMPTY_HINT.to_string(),
        Err(err) => {
            log::warn!("Hint source failed, using stock tip: {}", err);
            FALLBACK_HINT.to_string()
        }
    }
}
