//! Text rendering of the court.

use std::fmt::Write;

use tsume_core::court::{Cell, CourtConfig};
use tsume_core::session::GameSession;
use tsume_core::strategy::strategy_highlights;
use tsume_core::unit::{unit_at, Unit};

/// Two-character glyph for one cell. Units win over markings.
fn glyph(cell: Cell, units: &[Unit], highlights: &[Cell], court: &CourtConfig) -> String {
    if let Some(unit) = unit_at(units, cell) {
        let id = unit.id.to_string();
        return if unit.has_ball { id.to_uppercase() } else { id };
    }
    if court.is_basket(cell) {
        "()".to_string()
    } else if cell.y == court.reserved_row {
        "==".to_string()
    } else if highlights.contains(&cell) {
        "**".to_string()
    } else if court.is_on_arc(cell) {
        "..".to_string()
    } else if court.is_in_paint(cell) {
        "::".to_string()
    } else {
        " .".to_string()
    }
}

/// Baseline at the top, column indexes along both edges.
pub fn render_court(units: &[Unit], highlights: &[Cell], court: &CourtConfig) -> String {
    let mut out = String::from("   ");
    for x in 0..court.grid_size {
        let _ = write!(out, " {:>2}", x);
    }
    out.push('\n');
    for y in 0..court.grid_size {
        let _ = write!(out, "{:>2} ", y);
        for x in 0..court.grid_size {
            let _ = write!(out, " {}", glyph(Cell::new(x, y), units, highlights, court));
        }
        out.push('\n');
    }
    out
}

/// Court plus the status lines shown under it.
pub fn render_session(session: &GameSession) -> String {
    let possession = session.possession();
    let court = &session.config().court;
    let highlights = possession
        .active_strategy()
        .map(|s| strategy_highlights(possession.roster(), s, court))
        .unwrap_or_default();

    let mut out = render_court(possession.roster(), &highlights, court);
    let _ = write!(
        out,
        "\n{} | score {} | streak {} | best {} | pass {}/{} | {}",
        session.mode(),
        session.score(),
        session.streak(),
        session.high_score(),
        possession.turn(),
        session.config().rules.max_turns,
        possession.phase(),
    );
    if let Some(left) = session.time_left() {
        let _ = write!(out, " | {}s left", left);
    }
    if let Some(strategy) = possession.active_strategy() {
        let _ = write!(out, " | strategy: {}", strategy);
    }
    let _ = write!(out, "\n> {}\n", possession.message());
    out
}
