//! Property-based tests over the rules engine.

use proptest::prelude::*;

use crate::config::GameConfig;
use crate::court::{Cell, CourtConfig};
use crate::defense::{apply_defense_turn, is_screened};
use crate::possession::Action;
use crate::rules::{can_pass_to_teammate, is_valid_move};
use crate::scenario::generate_seeded;
use crate::session::{GameMode, GameSession};
use crate::unit::{Role, Unit, UnitId};

fn cell() -> impl Strategy<Value = Cell> {
    (0i32..9, 0i32..9).prop_map(|(x, y)| Cell::new(x, y))
}

fn action() -> impl Strategy<Value = Action> {
    (0u8..6, 1u8..=5, -1i32..=1, -1i32..=1).prop_map(|(kind, n, dx, dy)| match kind {
        0 | 1 => Action::Move { unit: UnitId::offense(n), to: Cell::new(dx, dy) },
        2 => Action::Stay(UnitId::offense(n)),
        3 => Action::Shoot,
        4 => Action::BeginPass,
        _ => Action::PassTo(UnitId::offense(n)),
    })
}

proptest! {
    /// Property: every neighbour is one Chebyshev step away, and distance is symmetric
    #[test]
    fn prop_neighbours_are_adjacent(a in cell(), b in cell()) {
        prop_assert_eq!(a.chebyshev(b), b.chebyshev(a));
        prop_assert_eq!(a.neighbours().count(), 8);
        prop_assert!(a.neighbours().all(|n| a.is_adjacent(n)));
        let mid = a.midpoint(b);
        prop_assert!(a.chebyshev(mid) <= a.chebyshev(b));
    }

    /// Property: moves never leave the grid, land on the reserved row, or cover two cells
    #[test]
    fn prop_moves_are_single_steps(from in (0i32..9, 1i32..9), to in (-1i32..10, -1i32..10)) {
        let court = CourtConfig::standard();
        let unit = Unit::offense(2, Role::SG, Cell::from(from));
        let target = Cell::from(to);
        if is_valid_move(&unit, target, &[unit.clone()], &court) {
            prop_assert!(court.is_playable(target));
            prop_assert!(unit.pos.chebyshev(target) <= 1);
        }
    }

    /// Property: a one-step orthogonal pass is open whenever the receiver is uncovered
    #[test]
    fn prop_orthogonal_handoff_is_open(
        x in 1i32..8,
        y in 1i32..8,
        dir in 0usize..4,
        defenders in prop::collection::vec(cell(), 0..5),
    ) {
        let (dx, dy) = [(1, 0), (-1, 0), (0, 1), (0, -1)][dir];
        let from = Unit::offense(1, Role::PG, Cell::new(x, y)).with_ball();
        let to = Unit::offense(2, Role::SG, Cell::new(x + dx, y + dy));
        let mut units = vec![from.clone(), to.clone()];
        for (i, pos) in defenders.into_iter().enumerate() {
            if pos != from.pos && pos != to.pos {
                units.push(Unit::defender(i as u8 + 1, Role::C, pos, None));
            }
        }
        prop_assert!(can_pass_to_teammate(&from, &to, &units));
    }

    /// Property: a defense turn leaves the offense alone and keeps the roster valid
    #[test]
    fn prop_defense_turn_keeps_roster_valid(seed in any::<u64>(), streak in 0u32..10) {
        let config = GameConfig::default();
        let before = generate_seeded(seed, &config.court);
        let after = apply_defense_turn(&before, streak, &config);

        prop_assert_eq!(after.validate(&config.court), Ok(()));
        for (old, new) in before.iter().zip(after.iter()) {
            prop_assert_eq!(old.id, new.id);
            if old.is_offense() {
                prop_assert_eq!(old.pos, new.pos);
            } else {
                prop_assert!(old.pos.chebyshev(new.pos) <= 1);
                if is_screened(old, &before) {
                    prop_assert_eq!(old.pos, new.pos);
                }
            }
        }
    }

    /// Property: arbitrary input never corrupts a session
    #[test]
    fn prop_sessions_survive_any_input(seed in any::<u64>(), actions in prop::collection::vec(action(), 0..40)) {
        let config = GameConfig::default();
        let mut session = GameSession::new(config.clone(), GameMode::StreakAttack, seed);
        let mut last_score = 0;

        for action in actions {
            let action = match action {
                Action::Move { unit, to } => match session.possession().roster().get(unit) {
                    Some(u) => Action::Move { unit, to: u.pos.offset(to.x, to.y) },
                    None => action,
                },
                other => other,
            };
            let _ = session.apply(action);

            prop_assert!(session.score() >= last_score);
            last_score = session.score();
            prop_assert!(session.possession().turn() <= config.rules.max_turns);
            prop_assert_eq!(session.possession().roster().validate(&config.court), Ok(()));
        }
    }
}
