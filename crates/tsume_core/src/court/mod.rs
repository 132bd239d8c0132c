//! Court geometry: cells, distance metrics and static zones.

mod cell;
mod zones;

pub use cell::Cell;
pub use zones::{CellRect, CourtConfig, OuterBounds};
