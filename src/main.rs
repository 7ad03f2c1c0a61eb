//! Terminal runner (default binary).
//!
//! Reads the session configuration, routes logs to a file (the terminal is in
//! raw mode on the alternate screen), and runs the fixed 60 Hz loop: pump key
//! events until the next tick, step the game once, draw.
//!
//! Environment:
//! - `BLOCKFALL_CONFIG`: JSON configuration file (defaults apply when unset)
//! - `BLOCKFALL_LOG`: log filter, e.g. `blockfall_core=debug`
//! - `BLOCKFALL_LOG_PATH`: log file, default `blockfall.log`
//! - `BLOCKFALL_SCORE_DIR`: best score directory, default `scores`

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use blockfall::core::{Game, GameConfig, ScoreStore};
use blockfall::input::{should_quit, KeyTracker};
use blockfall::term::{FrameBuffer, GameView, Screen, Viewport};
use blockfall::types::TICK_MS;
use blockfall::JsonScoreStore;

const CONFIG_ENV: &str = "BLOCKFALL_CONFIG";
const LOG_ENV: &str = "BLOCKFALL_LOG";
const LOG_PATH_ENV: &str = "BLOCKFALL_LOG_PATH";
const SCORE_DIR_ENV: &str = "BLOCKFALL_SCORE_DIR";

fn main() -> Result<()> {
    init_logging()?;

    let config = load_config()?;
    let mut store = JsonScoreStore::new(
        env::var_os(SCORE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("scores")),
    );
    let mut game = Game::new(config).context("invalid game configuration")?;
    if let Err(err) = game.load_best(&store) {
        warn!(%err, "could not read best score");
    }

    let mut screen = Screen::new();
    screen.enter()?;

    let result = run(&mut screen, &mut game, &mut store);

    // Always try to restore terminal state.
    let _ = screen.leave();
    save_best(&mut game, &mut store);
    result
}

fn init_logging() -> Result<()> {
    let path = env::var_os(LOG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("blockfall.log"));
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("blockfall=info,blockfall_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}

fn load_config() -> Result<GameConfig> {
    let Some(path) = env::var_os(CONFIG_ENV).map(PathBuf::from) else {
        return Ok(GameConfig::default());
    };
    let json = fs::read_to_string(&path)
        .with_context(|| format!("reading configuration {}", path.display()))?;
    let config = GameConfig::from_json_str(&json)
        .with_context(|| format!("parsing configuration {}", path.display()))?;
    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

fn save_best<S: ScoreStore>(game: &mut Game, store: &mut S) {
    match game.save_score(store) {
        Ok(true) => info!(score = game.score(), "new best score"),
        Ok(false) => {}
        Err(err) => warn!(%err, "could not save best score"),
    }
}

fn run(screen: &mut Screen, game: &mut Game, store: &mut JsonScoreStore) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut keys = KeyTracker::new();

    let tick = Duration::from_millis(TICK_MS as u64);
    let mut next_tick = Instant::now() + tick;
    let mut saved = false;

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&game.snapshot(), Viewport::new(w, h), &mut fb);
        screen.draw(&fb)?;

        // Input until the next tick is due.
        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Release && should_quit(key) {
                        return Ok(());
                    }
                    keys.handle_key_event(key);
                }
                Event::Resize(..) => screen.invalidate(),
                _ => {}
            }
        }

        let now = Instant::now();
        next_tick += tick;
        if next_tick < now {
            // Fell behind (suspended terminal, slow draw): drop the backlog.
            next_tick = now + tick;
        }

        let outcome = game.tick(&keys.take_frame());
        if outcome.restarted {
            saved = false;
        }
        if game.game_over() && !saved {
            save_best(game, store);
            saved = true;
        }
    }
}
