//! Parsing of the interactive play prompt.

use tsume_core::court::Cell;
use tsume_core::possession::Action;
use tsume_core::strategy::Strategy;
use tsume_core::unit::UnitId;

pub const HELP: &str = "\
commands:
  move <unit> <x> <y>   step a unit one cell (o2 3 4)
  stay <unit>           spend a unit's move in place
  moves <unit>          list a unit's legal destinations
  shoot                 shoot from the ball carrier's cell
  pass                  choose a pass target
  to <unit>             pass to a teammate
  cancel                back out of target selection
  strategy <name>       toggle pnr | spacing | backdoor
  undo                  take back the last action (once per turn)
  hint                  ask the coach
  board                 redraw the court
  quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    Moves(UnitId),
    Hint,
    Board,
    Help,
    Quit,
}

fn unit(arg: Option<&str>) -> Result<UnitId, String> {
    arg.ok_or_else(|| "Missing unit".to_string())?.parse()
}

fn coord(arg: Option<&str>) -> Result<i32, String> {
    let arg = arg.ok_or_else(|| "Missing coordinate".to_string())?;
    arg.parse().map_err(|_| format!("Bad coordinate: {}", arg))
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Command::Board);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "move" | "m" => {
            let unit = unit(words.next())?;
            let to = Cell::new(coord(words.next())?, coord(words.next())?);
            Command::Act(Action::Move { unit, to })
        }
        "stay" | "s" => Command::Act(Action::Stay(unit(words.next())?)),
        "moves" => Command::Moves(unit(words.next())?),
        "shoot" => Command::Act(Action::Shoot),
        "pass" | "p" => Command::Act(Action::BeginPass),
        "to" => Command::Act(Action::PassTo(unit(words.next())?)),
        "cancel" => Command::Act(Action::CancelPass),
        "undo" | "u" => Command::Act(Action::Undo),
        "strategy" => {
            let name: Vec<&str> = words.collect();
            Command::Act(Action::SelectStrategy(name.join(" ").parse::<Strategy>()?))
        }
        "hint" | "h" => Command::Hint,
        "board" | "b" => Command::Board,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command: {} (try help)", other)),
    };
    Ok(command)
}
