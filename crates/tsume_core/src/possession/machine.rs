use serde::{Deserialize, Serialize};

use super::state::{Action, FailureReason, History, Possession, PossessionEvent};
use crate::config::GameConfig;
use crate::error::IllegalAction;

/// Commits possession snapshots and keeps a one-deep undo.
///
/// Undo can be spent once per turn; a completed pass starts a new turn, drops the
/// saved snapshot and makes undo available again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessionMachine {
    current: Possession,
    previous: Option<Possession>,
    undo_used: bool,
}

impl PossessionMachine {
    pub fn new(possession: Possession) -> Self {
        Self { current: possession, previous: None, undo_used: false }
    }

    pub fn possession(&self) -> &Possession {
        &self.current
    }

    pub fn undo_used(&self) -> bool {
        self.undo_used
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_active() && self.previous.is_some() && !self.undo_used
    }

    pub fn apply(&mut self, action: Action, config: &GameConfig) -> Result<PossessionEvent, IllegalAction> {
        if action == Action::Undo {
            return self.undo();
        }

        let step = self.current.apply(action, config)?;
        match step.history {
            History::Save => {
                self.previous = Some(std::mem::replace(&mut self.current, step.possession));
            }
            History::Clear => {
                self.previous = None;
                self.undo_used = false;
                self.current = step.possession;
            }
            History::Keep => self.current = step.possession,
        }
        Ok(step.event)
    }

    pub fn undo(&mut self) -> Result<PossessionEvent, IllegalAction> {
        if !self.current.is_active() {
            return Err(IllegalAction::PossessionOver);
        }
        if self.undo_used {
            return Err(IllegalAction::UndoUsed);
        }
        let previous = self.previous.take().ok_or(IllegalAction::NothingToUndo)?;
        log::debug!("Undo back to {}", previous.phase());
        self.current = previous;
        self.undo_used = true;
        Ok(PossessionEvent::Undone)
    }

    /// Fail the possession from outside the turn flow. No-op once it is over.
    pub fn force_fail(&mut self, reason: FailureReason) {
        if self.current.is_active() {
            self.current = self.current.end_with(reason);
            self.previous = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::court::{Cell, CourtConfig};
    use crate::possession::{is_locked_up, Phase, PossessionStatus};
    use crate::rules::{MissReason, ShotKind};
    use crate::strategy::Strategy;
    use crate::unit::{Role, Roster, Unit, UnitId};

    fn board(offense: [(i32, i32); 5], defense: [(i32, i32); 5]) -> Roster {
        let mut units = Vec::new();
        for (i, (x, y)) in offense.into_iter().enumerate() {
            let mut u = Unit::offense(i as u8 + 1, Role::ALL[i], Cell::new(x, y));
            u.has_ball = i == 0;
            units.push(u);
        }
        for (i, (x, y)) in defense.into_iter().enumerate() {
            let guarding = UnitId::offense(i as u8 + 1);
            units.push(Unit::defender(i as u8 + 1, Role::ALL[i], Cell::new(x, y), Some(guarding)));
        }
        Roster::new(units)
    }

    /// PG on the top row with both wings open on the same row.
    fn wings_open() -> Roster {
        board([(4, 7), (2, 7), (6, 7), (3, 3), (5, 3)], [(4, 5), (2, 4), (6, 4), (3, 2), (5, 2)])
    }

    fn machine(roster: Roster) -> PossessionMachine {
        let roster_ok = roster.validate(&CourtConfig::standard());
        assert_eq!(roster_ok, Ok(()));
        PossessionMachine::new(Possession::new(roster, 0))
    }

    fn o(n: u8) -> UnitId {
        UnitId::offense(n)
    }

    fn supports_stay(m: &mut PossessionMachine, config: &GameConfig) {
        for n in 2..=5 {
            m.apply(Action::Stay(o(n)), config).unwrap();
        }
    }

    #[test]
    fn test_off_ball_phase_counts_support_moves() {
        let config = GameConfig::default();
        let mut m = machine(wings_open());
        assert_eq!(m.possession().message(), "Support moves: 0/4");

        let event = m.apply(Action::Move { unit: o(4), to: Cell::new(3, 4) }, &config).unwrap();
        assert_eq!(event, PossessionEvent::Moved { unit: o(4), to: Cell::new(3, 4), phase: Phase::OffBallMovement });
        assert_eq!(m.possession().message(), "Support moves: 1/4");

        m.apply(Action::Stay(o(2)), &config).unwrap();
        m.apply(Action::Stay(o(3)), &config).unwrap();
        assert_eq!(m.possession().phase(), Phase::OffBallMovement);

        m.apply(Action::Stay(o(5)), &config).unwrap();
        assert_eq!(m.possession().phase(), Phase::BallCarrierMovement);
        assert_eq!(m.possession().message(), "Off-ball set. Choose Ball-Carrier movement.");
    }

    #[test]
    fn test_off_ball_rejections_leave_state_untouched() {
        let config = GameConfig::default();
        let mut m = machine(wings_open());
        let before = m.clone();

        assert_eq!(m.apply(Action::Stay(o(1)), &config), Err(IllegalAction::SupportsFirst));
        assert!(matches!(
            m.apply(Action::Stay(UnitId::defense(1)), &config),
            Err(IllegalAction::NotMovable { .. })
        ));
        assert_eq!(
            m.apply(Action::Move { unit: o(2), to: Cell::new(2, 5) }, &config),
            Err(IllegalAction::InvalidDestination { unit: o(2), to: Cell::new(2, 5) })
        );
        assert!(matches!(m.apply(Action::Shoot, &config), Err(IllegalAction::WrongPhase { .. })));
        assert_eq!(m, before);

        m.apply(Action::Stay(o(2)), &config).unwrap();
        assert_eq!(m.apply(Action::Stay(o(2)), &config), Err(IllegalAction::AlreadyMoved(o(2))));
    }

    #[test]
    fn test_full_turn_with_blocked_shot_and_pass() {
        let config = GameConfig::default();
        let mut m = machine(wings_open());
        supports_stay(&mut m, &config);

        m.apply(Action::Stay(o(1)), &config).unwrap();
        assert_eq!(m.possession().phase(), Phase::ActionChoice);
        assert_eq!(m.possession().message(), "Action Phase: Finalize with a Shot or Pass.");

        assert_eq!(m.apply(Action::Shoot, &config), Ok(PossessionEvent::ShotBlocked(MissReason::TooFar)));
        assert_eq!(
            m.possession().message(),
            "BLOCKED! Too far! Move to arc or attack the rim! Find an open spot or pass!"
        );
        assert_eq!(m.possession().phase(), Phase::ActionChoice);

        m.apply(Action::BeginPass, &config).unwrap();
        assert_eq!(m.possession().open_targets(), vec![o(2), o(3)]);
        assert_eq!(m.apply(Action::PassTo(UnitId::defense(1)), &config), Err(IllegalAction::NotAReceiver(UnitId::defense(1))));
        assert_eq!(m.apply(Action::PassTo(o(4)), &config), Err(IllegalAction::PassDenied));
        assert_eq!(IllegalAction::PassDenied.to_string(), "Pass lane denied by defense!");

        let event = m.apply(Action::PassTo(o(2)), &config).unwrap();
        assert!(matches!(event, PossessionEvent::Passed { to, ref defense } if to == o(2) && defense.len() == 5));

        let p = m.possession();
        assert_eq!(p.turn(), 1);
        assert_eq!(p.phase(), Phase::OffBallMovement);
        assert!(p.moved().is_empty());
        assert_eq!(p.message(), "Turn 2: Move supports.");
        assert_eq!(p.roster().ball_carrier().map(|u| u.id), Some(o(2)));
        assert_eq!(p.roster().validate(&config.court), Ok(()));
    }

    #[test]
    fn test_cancel_pass_returns_to_action_choice() {
        let config = GameConfig::default();
        let mut m = machine(wings_open());
        supports_stay(&mut m, &config);
        m.apply(Action::Stay(o(1)), &config).unwrap();
        m.apply(Action::BeginPass, &config).unwrap();
        assert_eq!(m.apply(Action::CancelPass, &config), Ok(PossessionEvent::PhaseChanged(Phase::ActionChoice)));
        assert!(matches!(m.apply(Action::CancelPass, &config), Err(IllegalAction::WrongPhase { .. })));
    }

    #[test]
    fn test_undo_once_per_turn() {
        let config = GameConfig::default();
        let mut m = machine(wings_open());
        assert_eq!(m.apply(Action::Undo, &config), Err(IllegalAction::NothingToUndo));

        m.apply(Action::Move { unit: o(2), to: Cell::new(2, 6) }, &config).unwrap();
        assert!(m.can_undo());
        assert_eq!(m.apply(Action::Undo, &config), Ok(PossessionEvent::Undone));
        assert_eq!(m.possession().roster().get(o(2)).map(|u| u.pos), Some(Cell::new(2, 7)));
        assert!(m.possession().moved().is_empty());
        assert_eq!(m.possession().message(), "Support moves: 0/4");

        m.apply(Action::Stay(o(2)), &config).unwrap();
        assert_eq!(m.apply(Action::Undo, &config), Err(IllegalAction::UndoUsed));

        for n in 3..=5 {
            m.apply(Action::Stay(o(n)), &config).unwrap();
        }
        m.apply(Action::Stay(o(1)), &config).unwrap();
        m.apply(Action::BeginPass, &config).unwrap();
        m.apply(Action::PassTo(o(3)), &config).unwrap();

        // new turn: history gone, undo available again
        assert!(!m.undo_used());
        assert_eq!(m.apply(Action::Undo, &config), Err(IllegalAction::NothingToUndo));
        m.apply(Action::Stay(o(2)), &config).unwrap();
        assert_eq!(m.apply(Action::Undo, &config), Ok(PossessionEvent::Undone));
    }

    #[test]
    fn test_turn_limit_ends_possession() {
        let mut config = GameConfig::default();
        config.rules.max_turns = 1;
        let mut m = machine(wings_open());
        supports_stay(&mut m, &config);
        m.apply(Action::Stay(o(1)), &config).unwrap();
        m.apply(Action::BeginPass, &config).unwrap();

        let before = m.possession().roster().clone();
        assert_eq!(m.apply(Action::PassTo(o(2)), &config), Ok(PossessionEvent::Failed(FailureReason::TimeUp)));
        let p = m.possession();
        assert_eq!(p.status(), PossessionStatus::Failed(FailureReason::TimeUp));
        assert_eq!(p.message(), "TIME UP! GAME OVER");
        // defense does not react to the final pass
        assert!(p.roster().defense().zip(before.defense()).all(|(a, b)| a.pos == b.pos));

        assert_eq!(m.apply(Action::Stay(o(2)), &config), Err(IllegalAction::PossessionOver));
        assert_eq!(m.apply(Action::Undo, &config), Err(IllegalAction::PossessionOver));
    }

    #[test]
    fn test_ball_carrier_on_basket_dunks() {
        let config = GameConfig::default();
        let mut m = machine(board([(4, 2), (2, 7), (6, 7), (1, 3), (7, 3)], [(3, 1), (5, 1), (6, 4), (2, 3), (4, 4)]));
        supports_stay(&mut m, &config);
        let event = m.apply(Action::Move { unit: o(1), to: Cell::new(4, 1) }, &config).unwrap();
        assert_eq!(event, PossessionEvent::Scored { kind: ShotKind::SlamDunk, points: 2 });
        assert_eq!(m.possession().status(), PossessionStatus::Scored(ShotKind::SlamDunk));
        assert_eq!(m.possession().message(), "SLAM DUNK! +2. Unstoppable!");
    }

    #[test]
    fn test_open_three_scores() {
        let config = GameConfig::default();
        let mut m = machine(board([(4, 6), (2, 7), (6, 7), (1, 3), (7, 3)], [(2, 3), (6, 3), (8, 8), (3, 1), (5, 1)]));
        supports_stay(&mut m, &config);
        m.apply(Action::Move { unit: o(1), to: Cell::new(4, 5) }, &config).unwrap();
        assert_eq!(m.apply(Action::Shoot, &config), Ok(PossessionEvent::Scored { kind: ShotKind::ThreePointer, points: 3 }));
        assert_eq!(m.possession().message(), "BUCKET! 3-Pointer +3.");
    }

    #[test]
    fn test_lockup_on_entering_action_choice() {
        let config = GameConfig::default();
        let roster = board([(0, 8), (0, 5), (3, 8), (3, 5), (8, 1)], [(1, 8), (0, 7), (1, 7), (6, 2), (2, 2)]);
        assert!(is_locked_up(&roster, &config.court));

        let mut m = machine(roster);
        supports_stay(&mut m, &config);
        assert_eq!(m.possession().legal_moves(o(1), &config.court), vec![Cell::new(0, 8)]);
        assert_eq!(m.apply(Action::Stay(o(1)), &config), Ok(PossessionEvent::Failed(FailureReason::LockedUp)));
        assert_eq!(m.possession().message(), "LOCKED UP! GAME OVER");
    }

    /// Every off-ball unit stays, the carrier stays, then the ball goes to `to`.
    fn pass_turn(m: &mut PossessionMachine, config: &GameConfig, to: UnitId) -> Result<PossessionEvent, IllegalAction> {
        let supports: Vec<UnitId> = m.possession().roster().off_ball().map(|u| u.id).collect();
        for id in supports {
            m.apply(Action::Stay(id), config)?;
        }
        let carrier = m.possession().roster().ball_carrier().map(|u| u.id).ok_or(IllegalAction::PassDenied)?;
        m.apply(Action::Stay(carrier), config)?;
        m.apply(Action::BeginPass, config)?;
        m.apply(Action::PassTo(to), config)
    }

    /// o1 swings the ball along the back row to o2; d1 slides into the return lane.
    fn return_lane_closes() -> Roster {
        board([(4, 8), (0, 8), (6, 5), (3, 3), (6, 3)], [(2, 7), (8, 8), (8, 5), (3, 2), (7, 2)])
    }

    #[test]
    fn test_lockup_right_after_pass() {
        let config = GameConfig::default();
        let roster = return_lane_closes();
        assert!(!is_locked_up(&roster, &config.court));

        let mut m = machine(roster);
        assert_eq!(pass_turn(&mut m, &config, o(2)), Ok(PossessionEvent::Failed(FailureReason::LockedUp)));
        let p = m.possession();
        assert_eq!(p.status(), PossessionStatus::Failed(FailureReason::LockedUp));
        assert_eq!(p.message(), "LOCKED UP! GAME OVER");
        assert_eq!(p.roster().get(UnitId::defense(1)).map(|u| u.pos), Some(Cell::new(2, 8)));
        assert_eq!(p.roster().ball_carrier().map(|u| u.id), Some(o(2)));
        assert!(!m.can_undo());
    }

    #[test]
    fn test_post_pass_lockup_can_be_switched_off() {
        let mut config = GameConfig::default();
        config.rules.lockup_after_pass = false;
        let mut m = machine(return_lane_closes());

        let event = pass_turn(&mut m, &config, o(2)).unwrap();
        assert!(matches!(event, PossessionEvent::Passed { to, .. } if to == o(2)));
        assert!(m.possession().is_active());
        assert!(is_locked_up(m.possession().roster(), &config.court));
    }

    #[test]
    fn test_fourth_pass_runs_out_of_turns() {
        let config = GameConfig::default();
        assert_eq!(config.rules.max_turns, 4);
        // o1 and o2 side by side: the hand-off is open every turn
        let mut m = machine(board([(4, 7), (3, 7), (6, 7), (3, 3), (5, 3)], [(4, 5), (2, 4), (6, 4), (3, 2), (5, 2)]));

        for (turn, to) in [(1, o(2)), (2, o(1)), (3, o(2))] {
            let event = pass_turn(&mut m, &config, to).unwrap();
            assert!(matches!(event, PossessionEvent::Passed { .. }), "turn {}: {:?}", turn, event);
            assert!(m.possession().is_active());
            assert_eq!(m.possession().turn(), turn);
        }
        assert_eq!(m.possession().message(), "Turn 4: Move supports.");

        assert_eq!(pass_turn(&mut m, &config, o(1)), Ok(PossessionEvent::Failed(FailureReason::TimeUp)));
        assert_eq!(m.possession().status(), PossessionStatus::Failed(FailureReason::TimeUp));
        assert_eq!(m.possession().turn(), 3);
    }

    #[test]
    fn test_strategy_toggle_is_undoable() {
        let config = GameConfig::default();
        let mut m = machine(wings_open());
        assert_eq!(
            m.apply(Action::SelectStrategy(Strategy::PickAndRoll), &config),
            Ok(PossessionEvent::StrategyChanged(Some(Strategy::PickAndRoll)))
        );
        assert_eq!(m.possession().message(), "Strategy: pick and roll.");

        m.apply(Action::SelectStrategy(Strategy::FloorSpacing), &config).unwrap();
        assert_eq!(m.possession().active_strategy(), Some(Strategy::FloorSpacing));

        m.apply(Action::SelectStrategy(Strategy::FloorSpacing), &config).unwrap();
        assert_eq!(m.possession().active_strategy(), None);
        assert_eq!(m.possession().message(), "Strategy cleared.");

        m.apply(Action::Undo, &config).unwrap();
        assert_eq!(m.possession().active_strategy(), Some(Strategy::FloorSpacing));
    }

    #[test]
    fn test_force_fail() {
        let mut m = machine(wings_open());
        m.force_fail(FailureReason::ClockExpired);
        assert_eq!(m.possession().status(), PossessionStatus::Failed(FailureReason::ClockExpired));
        assert_eq!(m.possession().message(), "TIME EXPIRED! GAME OVER");
    }
}
