use crate::court::{Cell, CourtConfig};
use crate::unit::{is_occupied, Unit};

/// Single-step relocation check.
///
/// Staying put is legal; it is how a unit spends its move without moving. Only the
/// destination matters, so a unit may step diagonally between two occupied cells.
pub fn is_valid_move(unit: &Unit, target: Cell, units: &[Unit], court: &CourtConfig) -> bool {
    if !court.in_bounds(target) || target.y == court.reserved_row {
        return false;
    }
    match unit.pos.chebyshev(target) {
        0 => true,
        1 => !is_occupied(units, target),
        _ => false,
    }
}
