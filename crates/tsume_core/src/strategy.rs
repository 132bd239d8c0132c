//! Play templates the front end can overlay on the board.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::court::{Cell, CourtConfig};
use crate::unit::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    PickAndRoll,
    FloorSpacing,
    BackdoorCut,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::PickAndRoll, Strategy::FloorSpacing, Strategy::BackdoorCut];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::PickAndRoll => "pick and roll",
            Strategy::FloorSpacing => "floor spacing",
            Strategy::BackdoorCut => "backdoor cut",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "pick-and-roll" | "pnr" => Ok(Strategy::PickAndRoll),
            "floor-spacing" | "spacing" => Ok(Strategy::FloorSpacing),
            "backdoor-cut" | "backdoor" => Ok(Strategy::BackdoorCut),
            other => Err(format!("Unknown strategy: {}", other)),
        }
    }
}

/// Cells to highlight for `strategy` on the current board.
///
/// * pick and roll: the in-grid cells sharing an edge with the ball carrier's defender
/// * floor spacing: the arc
/// * backdoor cut: the two paint rows nearest the baseline
pub fn strategy_highlights(units: &[Unit], strategy: Strategy, court: &CourtConfig) -> Vec<Cell> {
    let Some(carrier) = units.iter().find(|u| u.has_ball) else {
        return Vec::new();
    };

    match strategy {
        Strategy::PickAndRoll => {
            let Some(guard) = units.iter().find(|u| u.is_defense() && u.assigned_to == Some(carrier.id)) else {
                return Vec::new();
            };
            [(1, 0), (-1, 0), (0, 1), (0, -1)]
                .into_iter()
                .map(|(dx, dy)| guard.pos.offset(dx, dy))
                .filter(|&c| court.in_bounds(c))
                .collect()
        }
        Strategy::FloorSpacing => court.arc.clone(),
        Strategy::BackdoorCut => {
            let rows = court.paint.y_min..=(court.paint.y_min + 1).min(court.paint.y_max);
            court.paint.cells().filter(|c| rows.contains(&c.y)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::opening_scenario;
    use crate::unit::{Role, UnitId};

    #[test]
    fn test_pick_and_roll_surrounds_ball_defender() {
        let roster = opening_scenario();
        let cells = strategy_highlights(&roster, Strategy::PickAndRoll, &CourtConfig::standard());
        // d1 guards the ball at (4,5)
        assert_eq!(cells, vec![Cell::new(5, 5), Cell::new(3, 5), Cell::new(4, 6), Cell::new(4, 4)]);
    }

    #[test]
    fn test_pick_and_roll_clips_to_grid() {
        let units = vec![
            Unit::offense(1, Role::PG, Cell::new(1, 7)).with_ball(),
            Unit::defender(1, Role::PG, Cell::new(0, 8), Some(UnitId::offense(1))),
        ];
        let cells = strategy_highlights(&units, Strategy::PickAndRoll, &CourtConfig::standard());
        assert_eq!(cells, vec![Cell::new(1, 8), Cell::new(0, 7)]);
    }

    #[test]
    fn test_pick_and_roll_without_ball_defender_is_empty() {
        let units = vec![Unit::offense(1, Role::PG, Cell::new(4, 7)).with_ball()];
        assert!(strategy_highlights(&units, Strategy::PickAndRoll, &CourtConfig::standard()).is_empty());
    }

    #[test]
    fn test_floor_spacing_and_backdoor() {
        let court = CourtConfig::standard();
        let roster = opening_scenario();
        assert_eq!(strategy_highlights(&roster, Strategy::FloorSpacing, &court).len(), 13);

        let backdoor = strategy_highlights(&roster, Strategy::BackdoorCut, &court);
        assert_eq!(backdoor.len(), 6);
        assert!(backdoor.contains(&court.basket));
        assert!(backdoor.iter().all(|c| (3..=5).contains(&c.x) && (1..=2).contains(&c.y)));
    }

    #[test]
    fn test_parse() {
        assert_eq!("pick-and-roll".parse::<Strategy>(), Ok(Strategy::PickAndRoll));
        assert_eq!("Floor Spacing".parse::<Strategy>(), Ok(Strategy::FloorSpacing));
        assert_eq!("backdoor".parse::<Strategy>(), Ok(Strategy::BackdoorCut));
        assert!("zone".parse::<Strategy>().is_err());
    }
}
