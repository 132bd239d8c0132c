use crate::court::Cell;
use crate::unit::{defender_at, Unit, UnitId};

/// Whether the lane from `start` (exclusive) to `end` (inclusive) is free of defenders.
///
/// Only horizontal, vertical and perfect diagonal lanes exist; any other offset is
/// never clear. Offensive units do not block.
pub fn path_clear(start: Cell, end: Cell, units: &[Unit]) -> bool {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    let straight = dx == 0 || dy == 0;
    let diagonal = dx.abs() == dy.abs();
    if !straight && !diagonal {
        return false;
    }

    let (step_x, step_y) = (dx.signum(), dy.signum());
    let mut cur = start;
    while cur != end {
        cur = cur.offset(step_x, step_y);
        if defender_at(units, cur) {
            return false;
        }
    }
    // start == end still has to check the destination
    !defender_at(units, end)
}

/// Whether `from` (the ball carrier) can hand the ball to `to`.
///
/// A one-step diagonal pass is shaded when a defender stands on either corner cell
/// between the two units, even though neither corner lies on the line itself.
pub fn can_pass_to_teammate(from: &Unit, to: &Unit, units: &[Unit]) -> bool {
    if defender_at(units, to.pos) {
        return false;
    }

    if from.pos.is_adjacent(to.pos) {
        let dx = to.pos.x - from.pos.x;
        let dy = to.pos.y - from.pos.y;
        if dx != 0 && dy != 0 {
            let row_corner = from.pos.offset(dx, 0);
            let column_corner = from.pos.offset(0, dy);
            if defender_at(units, row_corner) || defender_at(units, column_corner) {
                return false;
            }
        }
        return true;
    }

    path_clear(from.pos, to.pos, units)
}

/// Teammates the current ball carrier can legally pass to, in roster order.
pub fn open_passing_targets(units: &[Unit]) -> Vec<UnitId> {
    let Some(carrier) = units.iter().find(|u| u.has_ball) else {
        return Vec::new();
    };
    units
        .iter()
        .filter(|u| u.is_offense() && u.id != carrier.id)
        .filter(|u| can_pass_to_teammate(carrier, u, units))
        .map(|u| u.id)
        .collect()
}
