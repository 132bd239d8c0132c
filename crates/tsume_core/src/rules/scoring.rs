use serde::{Deserialize, Serialize};
use std::fmt;

use crate::court::CourtConfig;
use crate::unit::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotKind {
    ThreePointer,
    SlamDunk,
    Layup,
}

impl ShotKind {
    pub fn points(self) -> u32 {
        match self {
            ShotKind::ThreePointer => 3,
            ShotKind::SlamDunk | ShotKind::Layup => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShotKind::ThreePointer => "3-Pointer",
            ShotKind::SlamDunk => "Slam Dunk",
            ShotKind::Layup => "Layup",
        }
    }
}

impl fmt::Display for ShotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a shot was refused. Each reason carries its own player-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissReason {
    NoBall,
    Contested,
    RimProtected,
    TooFar,
}

impl MissReason {
    pub fn message(self) -> &'static str {
        match self {
            MissReason::NoBall => "No ball",
            MissReason::Contested => "Contested 3PT!",
            MissReason::RimProtected => "Rim Protected!",
            MissReason::TooFar => "Too far! Move to arc or attack the rim!",
        }
    }
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOutcome {
    Made(ShotKind),
    Missed(MissReason),
}

impl ShotOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ShotOutcome::Made(_))
    }

    pub fn points(&self) -> u32 {
        match self {
            ShotOutcome::Made(kind) => kind.points(),
            ShotOutcome::Missed(_) => 0,
        }
    }
}

/// Whether `unit` can score from where it stands.
///
/// Scoring is deliberately narrow: the arc, the basket and the layup cells are the
/// only shooting spots. Zones are checked in that order.
pub fn can_score(unit: &Unit, units: &[Unit], court: &CourtConfig) -> ShotOutcome {
    if !unit.has_ball {
        return ShotOutcome::Missed(MissReason::NoBall);
    }

    let mut defenders = units.iter().filter(|u| u.is_defense());

    if court.is_on_arc(unit.pos) {
        if defenders.any(|d| unit.pos.chebyshev(d.pos) <= 1) {
            return ShotOutcome::Missed(MissReason::Contested);
        }
        return ShotOutcome::Made(ShotKind::ThreePointer);
    }

    if court.is_basket(unit.pos) {
        return ShotOutcome::Made(ShotKind::SlamDunk);
    }

    if court.is_layup_cell(unit.pos) {
        if defenders.any(|d| d.pos.chebyshev(court.basket) <= 1) {
            return ShotOutcome::Missed(MissReason::RimProtected);
        }
        return ShotOutcome::Made(ShotKind::Layup);
    }

    ShotOutcome::Missed(MissReason::TooFar)
}
