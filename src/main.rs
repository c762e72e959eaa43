//! Dino Dash entry point
//!
//! Parses the command line, sets up logging and the terminal, then runs the
//! fixed-rate loop that merges frame ticks with decoded keyboard input.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use dino_dash::highscores::{HighScoreStore, JsonFileStore, MemoryStore};
use dino_dash::platform::{self, InputEvent, TerminalGuard};
use dino_dash::renderer::Renderer;
use dino_dash::sim::{Flow, Game, GameEvent};
use dino_dash::Config;

#[derive(Parser)]
#[command(name = "dino-dash")]
#[command(about = "Endless runner for the terminal", version)]
struct Cli {
    /// JSON config file (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Draw with plain ASCII instead of Unicode blocks
    #[arg(long)]
    ascii: bool,

    /// Frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// RNG seed for a reproducible obstacle stream
    #[arg(long)]
    seed: Option<u64>,

    /// High score file (default: ~/.dino-dash/scores.json)
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Keep the high score in memory only
    #[arg(long)]
    no_save: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if cli.ascii {
        config.use_unicode = false;
    }
    if let Some(fps) = cli.fps {
        config.target_fps = fps;
    }
    Ok(config)
}

fn open_store(cli: &Cli) -> Result<Box<dyn HighScoreStore>> {
    if cli.no_save {
        return Ok(Box::new(MemoryStore::default()));
    }
    let store = match &cli.scores {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::default_location().context("No location for the score file")?,
    };
    Ok(Box::new(store))
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn log_events(game: &mut Game) {
    for event in game.drain_events() {
        match event {
            GameEvent::NewHighScore { score } => log::info!("Run ended with a record: {}", score),
            GameEvent::Collision { kind } => log::debug!("Hit {}", kind),
            other => log::trace!("{:?}", other),
        }
    }
}

fn run(game: &mut Game, renderer: &mut Renderer, out: &mut impl Write) -> Result<()> {
    let input = platform::spawn_input_thread();
    let frame = game.config().frame_duration();

    let mut last_tick = Instant::now();
    let mut next_tick = last_tick + frame;

    renderer.draw(&game.snapshot());
    renderer.present(out)?;

    loop {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        match input.recv_timeout(timeout) {
            Ok(InputEvent::Command(command)) => match game.handle_command(command) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => log::warn!("Could not save high score: {}", e),
            },
            Ok(InputEvent::Resize(cols, rows)) => renderer.resize(cols, rows),
            Err(RecvTimeoutError::Timeout) => {
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f32();
                last_tick = now;
                next_tick += frame;
                // Fell behind: skip missed frames rather than bursting
                if next_tick < now {
                    next_tick = now + frame;
                }

                if let Err(e) = game.tick(dt) {
                    log::warn!("Could not save high score: {}", e);
                }
                log_events(game);

                renderer.draw(&game.snapshot());
                renderer.present(out)?;
            }
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Input closed, exiting");
                break;
            }
        }
    }

    game.shutdown();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let mut config = load_config(&cli)?;

    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let (cols, rows) = platform::terminal::size().context("Failed to read terminal size")?;
    config.screen_width = cols;
    config.screen_height = rows;

    let seed = cli.seed.unwrap_or_else(time_seed);
    let store = open_store(&cli)?;
    let mut game = Game::new(config, store, seed).context("Invalid configuration")?;
    let mut renderer = Renderer::new(game.config());

    log::info!("Dino Dash starting: {}", game.config());

    let mut out = BufWriter::new(io::stdout());
    let mut guard = TerminalGuard::enter(&mut out)?;
    let result = run(&mut game, &mut renderer, &mut out);
    guard.leave()?;

    let score = game.engine().score();
    println!(
        "Thanks for playing! High score: {}",
        score.high.max(score.current)
    );
    result
}
