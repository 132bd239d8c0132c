//! Tsume CLI
//!
//! Play the puzzle in a terminal, print generated scenarios, answer JSON rules
//! queries and show the local leaderboard.

mod board;
mod command;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use command::{parse_command, Command, HELP};
use tsume_core::coach::{coach_hint, PlaybookCoach};
use tsume_core::config::GameConfig;
use tsume_core::leaderboard::{LocalRecords, OfflineService, RankingBoard};
use tsume_core::possession::PossessionEvent;
use tsume_core::scenario::generate_seeded;
use tsume_core::session::{GameMode, GameOver, GameSession};

const CONFIG_ENV: &str = "TSUME_CONFIG";

#[derive(Parser)]
#[command(name = "tsume")]
#[command(about = "Half-court basketball puzzle", long_about = None)]
struct Cli {
    /// Game config JSON (falls back to $TSUME_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a generated scenario
    Scenario {
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Print the units as JSON instead of a board
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Play a game in the terminal
    Play {
        /// Scenario seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,

        /// streak-attack | time-attack
        #[arg(long, default_value = "streak-attack")]
        mode: GameMode,

        /// Local records file
        #[arg(long, default_value = "tsume_records.json")]
        records: PathBuf,
    },

    /// Answer one JSON rules query read from a file or stdin
    Rules {
        #[arg(long)]
        r#in: Option<PathBuf>,
    },

    /// Show the local leaderboard
    Rankings {
        #[arg(long, default_value = "tsume_records.json")]
        records: PathBuf,

        /// Only this mode
        #[arg(long)]
        mode: Option<GameMode>,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<GameConfig> {
    let path = path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let config = GameConfig::from_json_file(&path).with_context(|| format!("Failed to load config {:?}", path))?;
    log::info!("Loaded config from {:?}", path);
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Scenario { seed, json } => {
            let roster = generate_seeded(seed, &config.court);
            if json {
                println!("{}", serde_json::to_string_pretty(&roster)?);
            } else {
                print!("{}", board::render_court(&roster, &[], &config.court));
            }
        }
        Commands::Play { seed, mode, records } => {
            let seed = seed.unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as u64);
            play(config, mode, seed, &records)?;
        }
        Commands::Rules { r#in } => {
            let request = match r#in {
                Some(path) => std::fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?,
                None => {
                    let mut text = String::new();
                    io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            let response = tsume_core::api::evaluate_json(&request, &config).map_err(anyhow::Error::msg)?;
            println!("{}", response);
        }
        Commands::Rankings { records, mode: only } => {
            let records = LocalRecords::load(&records)?;
            let board = RankingBoard::new(OfflineService, records, &config.rules);
            println!("High score: {}", board.high_score());
            for mode in GameMode::ALL.into_iter().filter(|m| only.map_or(true, |o| o == *m)) {
                println!("\n{}", mode);
                for (rank, ranking) in board.top(mode).iter().enumerate() {
                    println!("{:>3}. {:<10} {:>4}  {}", rank + 1, ranking.name, ranking.score, ranking.short_date());
                }
            }
        }
    }

    Ok(())
}

fn play(config: GameConfig, mode: GameMode, seed: u64, records_path: &Path) -> Result<()> {
    let records = LocalRecords::load(records_path).unwrap_or_else(|err| {
        log::warn!("Ignoring unreadable records {:?}: {}", records_path, err);
        LocalRecords::default()
    });
    let mut rankings = RankingBoard::new(OfflineService, records, &config.rules).with_path(records_path);
    let coach = PlaybookCoach::new(config.clone());
    let mut session = GameSession::new(config.clone(), mode, seed).with_high_score(rankings.high_score());

    log::info!("Playing {} with seed {}", mode, seed);
    println!("{}", HELP);
    print!("\n{}", board::render_session(&session));

    let stdin = io::stdin();
    let mut clock = Instant::now();
    let mut lines = stdin.lock().lines();
    while !session.is_over() {
        print!("tsume> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;

        let elapsed = clock.elapsed().as_secs() as u32;
        if elapsed > 0 {
            clock = Instant::now();
            if session.advance_clock(elapsed).is_some() {
                break;
            }
        }

        match parse_command(&line) {
            Ok(Command::Act(action)) => match session.apply(action) {
                Ok(PossessionEvent::ShotBlocked(_)) | Ok(PossessionEvent::StrategyChanged(_)) => {
                    println!("{}", session.possession().message());
                }
                Ok(_) => print!("{}", board::render_session(&session)),
                Err(err) => println!("{}", err),
            },
            Ok(Command::Moves(id)) => {
                let cells = session.possession().legal_moves(id, &config.court);
                if cells.is_empty() {
                    println!("No unit {}", id);
                } else {
                    let cells: Vec<String> = cells.iter().map(ToString::to_string).collect();
                    println!("{}: {}", id, cells.join(" "));
                }
            }
            Ok(Command::Hint) => println!("Coach: {}", coach_hint(&coach, session.possession(), &config)),
            Ok(Command::Board) => print!("{}", board::render_session(&session)),
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Quit) => return Ok(()),
            Err(err) => println!("{}", err),
        }
    }

    let Some(over) = session.game_over() else {
        return Ok(());
    };
    print!("{}", board::render_session(&session));
    finish(&mut rankings, over, &mut lines)
}

fn finish<B: BufRead>(
    rankings: &mut RankingBoard<OfflineService>,
    over: GameOver,
    lines: &mut io::Lines<B>,
) -> Result<()> {
    println!("\nFinal score: {} ({} baskets in a row)", over.score, over.streak);
    rankings.record_high_score(over.score);
    match rankings.position_for(over.mode, over.score) {
        Some(place) => println!("That makes #{} on the {} board.", place, over.mode),
        None => println!("Not enough for the {} board this time.", over.mode),
    }

    print!("Name for the leaderboard (blank to skip): ");
    io::stdout().flush()?;
    let name = lines.next().transpose()?.unwrap_or_default();
    if name.trim().is_empty() {
        return Ok(());
    }
    match rankings.submit(&name, i64::from(over.score), over.mode) {
        Ok(ranking) => println!("Saved {} with {}.", ranking.name, ranking.score),
        Err(err) => println!("Ranking not saved: {}", err),
    }
    Ok(())
}
