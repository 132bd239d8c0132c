use serde::{Deserialize, Serialize};
use std::fmt;

use super::phase::Phase;
use crate::config::GameConfig;
use crate::court::{Cell, CourtConfig};
use crate::defense::{plan_defense_turn, DefenderMove};
use crate::error::IllegalAction;
use crate::rules::{can_pass_to_teammate, can_score, is_valid_move, MissReason, ShotKind, ShotOutcome};
use crate::strategy::Strategy;
use crate::unit::{Roster, Unit, UnitId};

const ACTION_PROMPT: &str = "Action Phase: Finalize with a Shot or Pass.";
const BALL_CARRIER_PROMPT: &str = "Off-ball set. Choose Ball-Carrier movement.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    /// Ball carrier can neither score nor pass.
    LockedUp,
    /// Pass budget used up without a score.
    TimeUp,
    /// Time-attack countdown ran out.
    ClockExpired,
}

impl FailureReason {
    pub fn message(self) -> &'static str {
        match self {
            FailureReason::LockedUp => "LOCKED UP! GAME OVER",
            FailureReason::TimeUp => "TIME UP! GAME OVER",
            FailureReason::ClockExpired => "TIME EXPIRED! GAME OVER",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PossessionStatus {
    Active,
    Scored(ShotKind),
    Failed(FailureReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Relocate a unit by one step; moving onto its own cell is a stay.
    Move { unit: UnitId, to: Cell },
    Stay(UnitId),
    Shoot,
    BeginPass,
    PassTo(UnitId),
    CancelPass,
    /// Toggle a strategy overlay.
    SelectStrategy(Strategy),
    Undo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PossessionEvent {
    Moved { unit: UnitId, to: Cell, phase: Phase },
    PhaseChanged(Phase),
    ShotBlocked(MissReason),
    Passed { to: UnitId, defense: Vec<DefenderMove> },
    StrategyChanged(Option<Strategy>),
    Scored { kind: ShotKind, points: u32 },
    Failed(FailureReason),
    Undone,
}

/// What a transition does to the undo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum History {
    /// Remember the previous snapshot.
    Save,
    /// Start a fresh turn: forget history, undo available again.
    Clear,
    /// Possession ended.
    Keep,
}

/// Result of one accepted action.
#[derive(Debug, Clone)]
pub struct Step {
    pub possession: Possession,
    pub event: PossessionEvent,
    pub(crate) history: History,
}

impl Step {
    fn save(possession: Possession, event: PossessionEvent) -> Self {
        Self { possession, event, history: History::Save }
    }

    fn terminal(possession: Possession, event: PossessionEvent) -> Self {
        Self { possession, event, history: History::Keep }
    }
}

/// Whether the ball carrier has no legal shot and no open pass.
///
/// One ply only: off-ball units that could still get open later are not considered.
pub fn is_locked_up(units: &[Unit], court: &CourtConfig) -> bool {
    let Some(carrier) = units.iter().find(|u| u.has_ball) else {
        return false;
    };
    if can_score(carrier, units, court).is_success() {
        return false;
    }
    !units
        .iter()
        .filter(|u| u.is_offense() && u.id != carrier.id)
        .any(|u| can_pass_to_teammate(carrier, u, units))
}

/// Immutable snapshot of one possession.
///
/// Every accepted action yields a new snapshot; rejected actions leave it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Possession {
    roster: Roster,
    phase: Phase,
    moved: Vec<UnitId>,
    /// Completed passes.
    turn: u32,
    /// Streak at possession start; drives defensive escalation.
    streak: u32,
    message: String,
    active_strategy: Option<Strategy>,
    status: PossessionStatus,
}

impl Possession {
    pub fn new(roster: Roster, streak: u32) -> Self {
        let supports = roster.off_ball().count();
        Self {
            roster,
            phase: Phase::OffBallMovement,
            moved: Vec::new(),
            turn: 0,
            streak,
            message: format!("Support moves: 0/{}", supports),
            active_strategy: None,
            status: PossessionStatus::Active,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn moved(&self) -> &[UnitId] {
        &self.moved
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn active_strategy(&self) -> Option<Strategy> {
        self.active_strategy
    }

    pub fn status(&self) -> PossessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == PossessionStatus::Active
    }

    /// Teammates the ball carrier can reach right now.
    pub fn open_targets(&self) -> Vec<UnitId> {
        crate::rules::open_passing_targets(&self.roster)
    }

    /// Legal destinations for `id`, own cell first, in neighbour order.
    pub fn legal_moves(&self, id: UnitId, court: &CourtConfig) -> Vec<Cell> {
        let Some(unit) = self.roster.get(id) else {
            return Vec::new();
        };
        std::iter::once(unit.pos)
            .chain(unit.pos.neighbours().filter(|&c| is_valid_move(unit, c, &self.roster, court)))
            .collect()
    }

    /// Apply one action, producing the next snapshot.
    pub fn apply(&self, action: Action, config: &GameConfig) -> Result<Step, IllegalAction> {
        if !self.is_active() {
            return Err(IllegalAction::PossessionOver);
        }
        match action {
            Action::Move { unit, to } => self.move_unit(unit, to, config),
            Action::Stay(unit) => {
                let at = self.unit(unit)?.pos;
                self.move_unit(unit, at, config)
            }
            Action::Shoot => self.shoot(config),
            Action::BeginPass => self.begin_pass(),
            Action::PassTo(to) => self.pass_to(to, config),
            Action::CancelPass => self.cancel_pass(),
            Action::SelectStrategy(strategy) => Ok(self.select_strategy(strategy)),
            // a bare snapshot keeps no history
            Action::Undo => Err(IllegalAction::NothingToUndo),
        }
    }

    /// End the possession from outside the turn flow (time-attack clock).
    pub fn end_with(&self, reason: FailureReason) -> Self {
        self.clone().fail(reason).possession
    }

    fn unit(&self, id: UnitId) -> Result<&Unit, IllegalAction> {
        self.roster.get(id).ok_or(IllegalAction::UnknownUnit(id))
    }

    fn enter(&mut self, phase: Phase, message: impl Into<String>) {
        debug_assert!(self.phase.allows(phase), "{} -> {}", self.phase, phase);
        log::debug!("Phase {} -> {}", self.phase, phase);
        self.phase = phase;
        self.message = message.into();
    }

    fn fail(mut self, reason: FailureReason) -> Step {
        log::info!("Possession failed after {} passes: {:?}", self.turn, reason);
        self.status = PossessionStatus::Failed(reason);
        self.message = reason.message().to_string();
        Step::terminal(self, PossessionEvent::Failed(reason))
    }

    fn score(mut self, kind: ShotKind, message: String) -> Step {
        log::info!("Possession scored: {} (+{})", kind, kind.points());
        self.status = PossessionStatus::Scored(kind);
        self.message = message;
        Step::terminal(self, PossessionEvent::Scored { kind, points: kind.points() })
    }

    fn move_unit(&self, id: UnitId, to: Cell, config: &GameConfig) -> Result<Step, IllegalAction> {
        let unit = self.unit(id)?;
        match self.phase {
            Phase::OffBallMovement => {
                if !unit.is_offense() {
                    return Err(IllegalAction::NotMovable { unit: id, phase: self.phase });
                }
                if unit.has_ball {
                    return Err(IllegalAction::SupportsFirst);
                }
                if self.moved.contains(&id) {
                    return Err(IllegalAction::AlreadyMoved(id));
                }
                if !is_valid_move(unit, to, &self.roster, &config.court) {
                    return Err(IllegalAction::InvalidDestination { unit: id, to });
                }

                let mut next = self.clone();
                next.roster = self.roster.with_unit_at(id, to);
                next.moved.push(id);
                let supports = next.roster.off_ball().count();
                if next.moved.len() >= supports {
                    next.enter(Phase::BallCarrierMovement, BALL_CARRIER_PROMPT);
                } else {
                    next.message = format!("Support moves: {}/{}", next.moved.len(), supports);
                }
                let phase = next.phase;
                Ok(Step::save(next, PossessionEvent::Moved { unit: id, to, phase }))
            }
            Phase::BallCarrierMovement => {
                if !unit.has_ball {
                    return Err(IllegalAction::NotMovable { unit: id, phase: self.phase });
                }
                if !is_valid_move(unit, to, &self.roster, &config.court) {
                    return Err(IllegalAction::InvalidDestination { unit: id, to });
                }

                let mut next = self.clone();
                next.roster = self.roster.with_unit_at(id, to);

                if config.court.is_basket(to) {
                    let outcome = next.roster.get(id).map(|u| can_score(u, &next.roster, &config.court));
                    if let Some(ShotOutcome::Made(kind)) = outcome {
                        let message = format!("SLAM DUNK! +{}. Unstoppable!", kind.points());
                        return Ok(next.score(kind, message));
                    }
                }

                next.enter(Phase::ActionChoice, ACTION_PROMPT);
                if is_locked_up(&next.roster, &config.court) {
                    return Ok(next.fail(FailureReason::LockedUp));
                }
                Ok(Step::save(next, PossessionEvent::Moved { unit: id, to, phase: Phase::ActionChoice }))
            }
            phase => Err(IllegalAction::WrongPhase { action: "move", phase }),
        }
    }

    fn shoot(&self, config: &GameConfig) -> Result<Step, IllegalAction> {
        if self.phase != Phase::ActionChoice {
            return Err(IllegalAction::WrongPhase { action: "shoot", phase: self.phase });
        }
        let outcome = match self.roster.ball_carrier() {
            Some(carrier) => can_score(carrier, &self.roster, &config.court),
            None => ShotOutcome::Missed(MissReason::NoBall),
        };

        match outcome {
            ShotOutcome::Made(kind) => {
                let message = format!("BUCKET! {} +{}.", kind, kind.points());
                Ok(self.clone().score(kind, message))
            }
            ShotOutcome::Missed(reason) => {
                log::debug!("Shot refused: {:?}", reason);
                let mut next = self.clone();
                next.message = format!("BLOCKED! {} Find an open spot or pass!", reason);
                Ok(Step::save(next, PossessionEvent::ShotBlocked(reason)))
            }
        }
    }

    fn begin_pass(&self) -> Result<Step, IllegalAction> {
        if self.phase != Phase::ActionChoice {
            return Err(IllegalAction::WrongPhase { action: "pass", phase: self.phase });
        }
        let mut next = self.clone();
        next.enter(Phase::PassTargetSelection, "Choose a target for the pass.");
        Ok(Step::save(next, PossessionEvent::PhaseChanged(Phase::PassTargetSelection)))
    }

    fn cancel_pass(&self) -> Result<Step, IllegalAction> {
        if self.phase != Phase::PassTargetSelection {
            return Err(IllegalAction::WrongPhase { action: "cancel a pass", phase: self.phase });
        }
        let mut next = self.clone();
        next.enter(Phase::ActionChoice, ACTION_PROMPT);
        Ok(Step::save(next, PossessionEvent::PhaseChanged(Phase::ActionChoice)))
    }

    fn pass_to(&self, to: UnitId, config: &GameConfig) -> Result<Step, IllegalAction> {
        if self.phase != Phase::PassTargetSelection {
            return Err(IllegalAction::WrongPhase { action: "pass", phase: self.phase });
        }
        let carrier = self.roster.ball_carrier().ok_or(IllegalAction::PassDenied)?;
        let receiver = self.unit(to)?;
        if !receiver.is_offense() || receiver.id == carrier.id {
            return Err(IllegalAction::NotAReceiver(to));
        }
        if !can_pass_to_teammate(carrier, receiver, &self.roster) {
            return Err(IllegalAction::PassDenied);
        }

        let passed = self.roster.with_ball_passed(carrier.id, to);
        let next_turn = self.turn + 1;
        let mut next = self.clone();

        if next_turn >= config.rules.max_turns {
            next.roster = passed;
            let mut step = next.fail(FailureReason::TimeUp);
            step.history = History::Clear;
            return Ok(step);
        }

        let (roster, defense) = plan_defense_turn(&passed, self.streak, config);
        next.roster = roster;
        next.turn = next_turn;
        next.moved.clear();
        next.enter(Phase::OffBallMovement, format!("Turn {}: Move supports.", next_turn + 1));
        log::debug!("Pass {} -> {} completed, turn {}", carrier.id, to, next_turn);

        if config.rules.lockup_after_pass && is_locked_up(&next.roster, &config.court) {
            let mut step = next.fail(FailureReason::LockedUp);
            step.history = History::Clear;
            return Ok(step);
        }

        Ok(Step { possession: next, event: PossessionEvent::Passed { to, defense }, history: History::Clear })
    }

    fn select_strategy(&self, strategy: Strategy) -> Step {
        let mut next = self.clone();
        next.active_strategy = if self.active_strategy == Some(strategy) { None } else { Some(strategy) };
        next.message = match next.active_strategy {
            Some(s) => format!("Strategy: {}.", s),
            None => "Strategy cleared.".to_string(),
        };
        let active = next.active_strategy;
        Step::save(next, PossessionEvent::StrategyChanged(active))
    }
}
