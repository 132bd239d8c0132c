//! Units on the court and the roster snapshot every rule reads from.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::court::{Cell, CourtConfig};
use crate::error::RosterError;

/// Units per side in every possession.
pub const TEAM_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Offense,
    Defense,
}

impl Team {
    fn prefix(self) -> char {
        match self {
            Team::Offense => 'o',
            Team::Defense => 'd',
        }
    }
}

/// Role label shared between a defender and the offensive unit it guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    PG,
    SG,
    SF,
    PF,
    C,
}

impl Role {
    pub const ALL: [Role; TEAM_SIZE] = [Role::PG, Role::SG, Role::SF, Role::PF, Role::C];

    pub fn label(self) -> &'static str {
        match self {
            Role::PG => "PG",
            Role::SG => "SG",
            Role::SF => "SF",
            Role::PF => "PF",
            Role::C => "C",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable unit identifier, rendered as `o1`..`o5` / `d1`..`d5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId {
    pub team: Team,
    pub number: u8,
}

impl UnitId {
    pub const fn offense(number: u8) -> Self {
        Self { team: Team::Offense, number }
    }

    pub const fn defense(number: u8) -> Self {
        Self { team: Team::Defense, number }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.team.prefix(), self.number)
    }
}

impl FromStr for UnitId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let mut chars = s.chars();
        let team = match chars.next() {
            Some('o') => Team::Offense,
            Some('d') => Team::Defense,
            _ => return Err(format!("Unknown unit id: {}", s)),
        };
        let number = chars.as_str().parse::<u8>().map_err(|_| format!("Unknown unit id: {}", s))?;
        Ok(Self { team, number })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub team: Team,
    pub role: Role,
    pub pos: Cell,
    pub has_ball: bool,
    /// Nominal matchup; defenders only.
    #[serde(default)]
    pub assigned_to: Option<UnitId>,
}

impl Unit {
    pub fn offense(number: u8, role: Role, pos: Cell) -> Self {
        Self {
            id: UnitId::offense(number),
            team: Team::Offense,
            role,
            pos,
            has_ball: false,
            assigned_to: None,
        }
    }

    pub fn defender(number: u8, role: Role, pos: Cell, assigned_to: Option<UnitId>) -> Self {
        Self { id: UnitId::defense(number), team: Team::Defense, role, pos, has_ball: false, assigned_to }
    }

    pub fn with_ball(mut self) -> Self {
        self.has_ball = true;
        self
    }

    #[inline]
    pub fn is_offense(&self) -> bool {
        self.team == Team::Offense
    }

    #[inline]
    pub fn is_defense(&self) -> bool {
        self.team == Team::Defense
    }
}

/// Immutable snapshot of every unit in a possession.
///
/// Transitions produce a new roster; nothing mutates a roster that a caller still holds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    units: Vec<Unit>,
}

impl Deref for Roster {
    type Target = [Unit];

    fn deref(&self) -> &[Unit] {
        &self.units
    }
}

impl From<Vec<Unit>> for Roster {
    fn from(units: Vec<Unit>) -> Self {
        Self { units }
    }
}

impl Roster {
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units }
    }

    pub fn into_units(self) -> Vec<Unit> {
        self.units
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn ball_carrier(&self) -> Option<&Unit> {
        self.units.iter().find(|u| u.has_ball)
    }

    pub fn offense(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_offense())
    }

    pub fn defense(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_defense())
    }

    /// Offensive units except the ball carrier.
    pub fn off_ball(&self) -> impl Iterator<Item = &Unit> {
        self.offense().filter(|u| !u.has_ball)
    }

    /// Copy of this roster with one unit relocated.
    pub fn with_unit_at(&self, id: UnitId, pos: Cell) -> Roster {
        let mut next = self.clone();
        if let Some(unit) = next.units.iter_mut().find(|u| u.id == id) {
            unit.pos = pos;
        }
        next
    }

    /// Copy of this roster with the ball handed from `from` to `to`.
    pub fn with_ball_passed(&self, from: UnitId, to: UnitId) -> Roster {
        let mut next = self.clone();
        for unit in &mut next.units {
            if unit.id == from {
                unit.has_ball = false;
            } else if unit.id == to {
                unit.has_ball = true;
            }
        }
        next
    }

    pub(crate) fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    /// Check the possession invariants: 5 + 5 units, unique ids and cells, nobody on
    /// an unplayable cell, exactly one offensive ball carrier.
    pub fn validate(&self, court: &CourtConfig) -> Result<(), RosterError> {
        let offense = self.offense().count();
        let defense = self.defense().count();
        if offense != TEAM_SIZE || defense != TEAM_SIZE {
            return Err(RosterError::TeamSize { expected: TEAM_SIZE, offense, defense });
        }

        let mut ids = HashSet::new();
        for unit in &self.units {
            if !ids.insert(unit.id) {
                return Err(RosterError::DuplicateId(unit.id));
            }
            if !court.is_playable(unit.pos) {
                return Err(RosterError::Unplayable { unit: unit.id, cell: unit.pos });
            }
            if unit.is_defense() && unit.has_ball {
                return Err(RosterError::DefenderWithBall(unit.id));
            }
        }

        for (i, a) in self.units.iter().enumerate() {
            if let Some(b) = self.units[i + 1..].iter().find(|b| b.pos == a.pos) {
                return Err(RosterError::Overlap { cell: a.pos, first: a.id, second: b.id });
            }
        }

        let carriers = self.units.iter().filter(|u| u.has_ball).count();
        if carriers != 1 {
            return Err(RosterError::BallCount(carriers));
        }

        Ok(())
    }
}

/// First unit standing on `cell`.
pub fn unit_at(units: &[Unit], cell: Cell) -> Option<&Unit> {
    units.iter().find(|u| u.pos == cell)
}

#[inline]
pub fn is_occupied(units: &[Unit], cell: Cell) -> bool {
    units.iter().any(|u| u.pos == cell)
}

#[inline]
pub fn defender_at(units: &[Unit], cell: Cell) -> bool {
    units.iter().any(|u| u.is_defense() && u.pos == cell)
}
