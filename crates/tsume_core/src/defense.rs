//! Defense Policy
//!
//! Repositions every defender once per completed pass.
//!
//! ## Per-defender order
//! 1. Screen: any offensive unit edge-adjacent freezes the defender for the turn
//! 2. Candidate moves: own cell first, then free neighbours
//! 3. Advanced denial (streak gate): take the rim, else shade the nearest arc spot
//! 4. Standard: ball man sits between ball and basket, others deny the passing lane
//!
//! Defenders move one after another in roster order, so each one sees the cells the
//! earlier ones just took. Ties go to the earliest candidate, which is the own cell.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::court::{Cell, CourtConfig};
use crate::unit::{is_occupied, Roster, Unit, UnitId};

/// What a defender decided this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefenseDecision {
    Screened,
    RimDenial,
    ArcDenial { arc: Cell },
    GuardBall { toward: Cell },
    DenyPass { guarding: UnitId, toward: Cell },
    Hold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenderMove {
    pub defender: UnitId,
    pub from: Cell,
    pub to: Cell,
    pub decision: DefenseDecision,
}

/// Whether any offensive unit shares an edge with `defender`.
///
/// The ball carrier counts too, so a screen holds after the ball is passed to the screener.
pub fn is_screened(defender: &Unit, units: &[Unit]) -> bool {
    units.iter().any(|o| o.is_offense() && o.pos.is_orthogonal_adjacent(defender.pos))
}

/// Cells a defender may end the turn on: its own cell, then every free playable
/// neighbour in neighbour order.
pub fn candidate_moves(defender: &Unit, units: &[Unit], court: &CourtConfig) -> Vec<Cell> {
    let others: Vec<Unit> = units.iter().filter(|u| u.id != defender.id).cloned().collect();
    std::iter::once(defender.pos)
        .chain(defender.pos.neighbours().filter(|&c| court.is_playable(c) && !is_occupied(&others, c)))
        .collect()
}

/// First candidate with the smallest distance to `target`.
fn closest(moves: &[Cell], target: Cell) -> Option<Cell> {
    let mut best: Option<Cell> = None;
    for &m in moves {
        match best {
            Some(b) if b.chebyshev(target) <= m.chebyshev(target) => {}
            _ => best = Some(m),
        }
    }
    best
}

fn advanced_target(moves: &[Cell], carrier: &Unit, config: &GameConfig) -> Option<(Cell, DefenseDecision)> {
    let court = &config.court;
    let rules = &config.rules;

    if carrier.pos.chebyshev(court.basket) <= rules.rim_denial_radius && moves.contains(&court.basket) {
        return Some((court.basket, DefenseDecision::RimDenial));
    }

    court
        .arc
        .iter()
        .filter(|arc| carrier.pos.chebyshev(**arc) <= rules.arc_denial_radius)
        .find_map(|&arc| {
            moves
                .iter()
                .find(|&&m| m.chebyshev(arc) <= 1 && m != arc)
                .map(|&m| (m, DefenseDecision::ArcDenial { arc }))
        })
}

fn standard_target(
    defender: &Unit,
    moves: &[Cell],
    carrier: &Unit,
    units: &[Unit],
    court: &CourtConfig,
) -> (Cell, DefenseDecision) {
    let Some(assigned) = defender.assigned_to else {
        return (defender.pos, DefenseDecision::Hold);
    };

    if assigned == carrier.id {
        let toward = carrier.pos.midpoint(court.basket);
        let to = closest(moves, toward).unwrap_or(defender.pos);
        return (to, DefenseDecision::GuardBall { toward });
    }

    match units.iter().find(|u| u.is_offense() && u.id == assigned) {
        Some(man) => {
            let toward = carrier.pos.midpoint(man.pos);
            let to = closest(moves, toward).unwrap_or(defender.pos);
            (to, DefenseDecision::DenyPass { guarding: assigned, toward })
        }
        None => (defender.pos, DefenseDecision::Hold),
    }
}

/// Run one defensive turn and report each defender's decision.
pub fn plan_defense_turn(units: &[Unit], streak: u32, config: &GameConfig) -> (Roster, Vec<DefenderMove>) {
    let mut next = Roster::new(units.to_vec());
    let Some(carrier) = next.ball_carrier().cloned() else {
        log::warn!("Defense turn requested without a ball carrier");
        return (next, Vec::new());
    };
    let advanced = streak >= config.rules.advanced_defense_streak;

    let defender_ids: Vec<UnitId> = next.defense().map(|d| d.id).collect();
    let mut report = Vec::with_capacity(defender_ids.len());

    for id in defender_ids {
        let Some(defender) = next.get(id).cloned() else { continue };

        let (to, decision) = if is_screened(&defender, &next) {
            (defender.pos, DefenseDecision::Screened)
        } else {
            let moves = candidate_moves(&defender, &next, &config.court);
            let advanced_pick =
                if advanced { advanced_target(&moves, &carrier, config) } else { None };
            advanced_pick
                .unwrap_or_else(|| standard_target(&defender, &moves, &carrier, &next, &config.court))
        };

        log::debug!("Defender {} {} -> {} ({:?})", id, defender.pos, to, decision);
        if let Some(unit) = next.units_mut().iter_mut().find(|u| u.id == id) {
            unit.pos = to;
        }
        report.push(DefenderMove { defender: id, from: defender.pos, to, decision });
    }

    (next, report)
}

/// Defensive reaction to a completed pass; returns the new roster.
pub fn apply_defense_turn(units: &[Unit], streak: u32, config: &GameConfig) -> Roster {
    plan_defense_turn(units, streak, config).0
}
