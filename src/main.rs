use std::io;
use std::ops::ControlFlow;
use std::panic;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{LevelFilter, debug, info};
use power_snake::config::DifficultyLevel;
use power_snake::game::{EngineConfig, Game, GameOverReason, Phase, TickEvent};
use power_snake::input::{Direction, GameInput};
use power_snake::logging::init_file_logger;
use power_snake::renderer::Scene;
use power_snake::score::{HighScoreStore, JsonScoreStore};
use power_snake::terminal_runtime::{TerminalSession, restore_terminal};

/// Upper bound on how long the loop waits for input between redraws.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Difficulty preselected on the start screen.
    #[arg(long, value_enum, default_value_t = DifficultyLevel::Normal)]
    difficulty: DifficultyLevel,

    /// Seed food and power-up placement for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to keep the high score (defaults to the user data directory).
    #[arg(long = "scores-file")]
    scores_file: Option<PathBuf>,

    /// Append engine logs to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log at debug level instead of info.
    #[arg(long)]
    verbose: bool,
}

/// Front-end state that lives outside the engine.
struct Frontend {
    selected_level: DifficultyLevel,
    outcome: Option<(GameOverReason, bool)>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
        if let Err(error) = init_file_logger(path, level) {
            eprintln!("Failed to open log file {}: {error}", path.display());
        }
    }

    let store = cli
        .scores_file
        .clone()
        .map_or_else(JsonScoreStore::new, JsonScoreStore::at_path);
    // Surface a broken score file before the terminal switches to raw mode.
    if let Err(error) = store.load() {
        eprintln!(
            "Warning: could not read high score from {}: {error}",
            store.path().display()
        );
    }

    install_panic_hook();
    run(&cli, store)
}

fn run(cli: &Cli, store: JsonScoreStore) -> io::Result<()> {
    let mut terminal = TerminalSession::enter()?;
    let mut game = Game::new(EngineConfig { seed: cli.seed }, store);
    let mut frontend = Frontend {
        selected_level: cli.difficulty,
        outcome: None,
    };
    info!("power-snake started, high score {}", game.high_score());

    let mut last_advance = Instant::now();
    loop {
        terminal.draw(&Scene {
            phase: game.phase(),
            session: game.session(),
            high_score: game.high_score(),
            selected_level: frontend.selected_level,
            outcome: frontend.outcome,
            now: game.now(),
        })?;

        let timeout = game
            .time_until_next_event()
            .map_or(FRAME_INTERVAL, |wait| wait.min(FRAME_INTERVAL));
        if let Some(input) = terminal.poll_input(timeout)? {
            if handle_input(&mut game, &mut frontend, input)?.is_break() {
                break;
            }
        }

        let elapsed = last_advance.elapsed();
        last_advance = Instant::now();
        for result in game.advance(elapsed) {
            for event in result.events {
                debug!("tick event: {event:?}");
                if let TickEvent::GameOver {
                    reason,
                    new_high_score,
                } = event
                {
                    frontend.outcome = Some((reason, new_high_score));
                }
            }
        }
    }

    info!("power-snake exiting, high score {}", game.high_score());
    Ok(())
}

fn handle_input<S: HighScoreStore>(
    game: &mut Game<S>,
    frontend: &mut Frontend,
    input: GameInput,
) -> io::Result<ControlFlow<()>> {
    if input == GameInput::Quit {
        return Ok(ControlFlow::Break(()));
    }

    match (game.phase(), input) {
        (Phase::NotStarted, GameInput::Easier | GameInput::Direction(Direction::LEFT)) => {
            frontend.selected_level = frontend.selected_level.easier();
        }
        (Phase::NotStarted, GameInput::Harder | GameInput::Direction(Direction::RIGHT)) => {
            frontend.selected_level = frontend.selected_level.harder();
        }
        (Phase::NotStarted, GameInput::SelectDifficulty(index)) => {
            if let Some(level) = DifficultyLevel::ALL.get(index) {
                frontend.selected_level = *level;
            }
        }
        (Phase::NotStarted, GameInput::Confirm) => {
            game.start(frontend.selected_level)
                .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
        }
        (Phase::Playing, GameInput::Direction(direction)) => {
            if !game.set_direction(direction) {
                debug!("direction {direction:?} rejected");
            }
        }
        (Phase::GameOver, GameInput::Confirm) => {
            game.restart();
            frontend.outcome = None;
        }
        (phase, other) => debug!("ignoring {other:?} in phase {phase:?}"),
    }

    Ok(ControlFlow::Continue(()))
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}
