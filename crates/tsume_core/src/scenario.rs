//! Scenario Generator
//!
//! Builds a fresh 10-unit layout for every possession.
//!
//! ## Placement order
//! 1. PG (ball) on the start row
//! 2. SG, SF in three-point territory ahead of the PG
//! 3. PF, C inside the arc ahead of the PG
//! 4. One defender per offensive unit, inside the arc or on it
//!
//! Each placement prefers a cell that is not next to an already placed teammate and
//! falls back to any free cell, so generation always completes.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::court::{Cell, CourtConfig};
use crate::unit::{Role, Roster, Team, Unit, UnitId, TEAM_SIZE};

/// Row the ball handler starts on: the deepest row short of the back edge.
pub fn start_row(court: &CourtConfig) -> i32 {
    court.grid_size - 2
}

pub fn generate_scenario<R: Rng + ?Sized>(rng: &mut R, court: &CourtConfig) -> Roster {
    let start = start_row(court);
    let playable: Vec<Cell> = court.playable_cells().collect();

    let pool = |rng: &mut R, keep: &dyn Fn(Cell) -> bool| -> Vec<Cell> {
        let mut cells: Vec<Cell> = playable.iter().copied().filter(|&c| keep(c)).collect();
        cells.shuffle(rng);
        cells
    };

    let handler_pool = pool(&mut *rng, &|c| c.y == start);
    let inside_pool = pool(&mut *rng, &|c| !court.is_three_point_area(c) && c.y < start);
    let outside_pool = pool(&mut *rng, &|c| court.is_three_point_area(c) && c.y < start);
    let defender_pool = pool(&mut *rng, &|c| !court.is_three_point_area(c) || court.is_on_arc(c));

    let mut placer = Placer { court, playable: &playable, units: Vec::with_capacity(TEAM_SIZE * 2) };

    let offense_plan: [(Role, &[Cell]); TEAM_SIZE] = [
        (Role::PG, &handler_pool),
        (Role::SG, &outside_pool),
        (Role::SF, &outside_pool),
        (Role::PF, &inside_pool),
        (Role::C, &inside_pool),
    ];
    for (number, (role, cells)) in (1u8..).zip(offense_plan) {
        if let Some(pos) = placer.pick(cells, Team::Offense) {
            let mut unit = Unit::offense(number, role, pos);
            unit.has_ball = role == Role::PG;
            placer.units.push(unit);
        }
    }

    let matchups: Vec<(UnitId, Role)> = placer.units.iter().map(|u| (u.id, u.role)).collect();
    for (number, (guarding, role)) in (1u8..).zip(matchups) {
        if let Some(pos) = placer.pick(&defender_pool, Team::Defense) {
            placer.units.push(Unit::defender(number, role, pos, Some(guarding)));
        }
    }

    Roster::new(placer.units)
}

/// Scenario from a seed; the same seed always yields the same layout.
pub fn generate_seeded(seed: u64, court: &CourtConfig) -> Roster {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_scenario(&mut rng, court)
}

/// Hand-built opening layout used for the tutorial board.
pub fn opening_scenario() -> Roster {
    let o = UnitId::offense;
    Roster::new(vec![
        Unit::offense(1, Role::PG, Cell::new(4, 7)).with_ball(),
        Unit::offense(2, Role::SG, Cell::new(1, 5)),
        Unit::offense(3, Role::SF, Cell::new(7, 5)),
        Unit::offense(4, Role::PF, Cell::new(3, 3)),
        Unit::offense(5, Role::C, Cell::new(5, 3)),
        Unit::defender(1, Role::PG, Cell::new(4, 5), Some(o(1))),
        Unit::defender(2, Role::SG, Cell::new(2, 4), Some(o(2))),
        Unit::defender(3, Role::SF, Cell::new(6, 4), Some(o(3))),
        Unit::defender(4, Role::PF, Cell::new(3, 2), Some(o(4))),
        Unit::defender(5, Role::C, Cell::new(5, 2), Some(o(5))),
    ])
}

struct Placer<'a> {
    court: &'a CourtConfig,
    playable: &'a [Cell],
    units: Vec<Unit>,
}

impl Placer<'_> {
    fn is_free(&self, cell: Cell) -> bool {
        !self.court.is_basket(cell) && !self.units.iter().any(|u| u.pos == cell)
    }

    fn crowds_teammate(&self, cell: Cell, team: Team) -> bool {
        self.units.iter().any(|u| u.team == team && u.pos.is_adjacent(cell))
    }

    fn pick(&self, pool: &[Cell], team: Team) -> Option<Cell> {
        if let Some(&cell) = pool.iter().find(|&&c| self.is_free(c) && !self.crowds_teammate(c, team)) {
            return Some(cell);
        }
        if let Some(&cell) = pool.iter().find(|&&c| self.is_free(c)) {
            log::debug!("No spaced cell left for {:?}, placing next to a teammate", team);
            return Some(cell);
        }
        let fallback = self.playable.iter().copied().find(|&c| self.is_free(c));
        if fallback.is_none() {
            log::error!("Court has no free playable cell left for {:?}", team);
        } else {
            log::debug!("Zone pool exhausted for {:?}, using any free cell", team);
        }
        fallback
    }
}
