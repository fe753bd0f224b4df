//! Terminal Tetris runner (default binary).
//!
//! Plays a session in the terminal at a fixed 16ms tick. When the TCP adapter
//! is enabled (default), an external agent can drive the same session; with
//! `--headless` the adapter is the only input and nothing is drawn.

use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEventKind};

use qtetris::adapter::Adapter;
use qtetris::cli::parse_play_args;
use qtetris::core::{GameSnapshot, SessionConfig};
use qtetris::game::Game;
use qtetris::input::{should_quit, InputHandler};
use qtetris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use qtetris::types::{Controls, TICK_MS};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let play = parse_play_args(&args)?;
    let config = SessionConfig::from_env()?;
    let seed = play.seed.unwrap_or_else(clock_seed);

    let adapter = Adapter::start_from_env()?;
    let mut game = Game::new(config, seed);

    if play.headless {
        let mut adapter = adapter
            .ok_or_else(|| anyhow!("--headless needs the adapter; unset QTETRIS_AI_DISABLED"))?;
        println!("[Game] Headless session, seed {}", seed);
        run_headless(&mut game, &mut adapter);
        return Ok(());
    }

    let mut term = TerminalRenderer::new();
    let result = term.enter().and_then(|_| run(&mut term, &mut game, adapter));

    // Always try to restore terminal state.
    let _ = term.exit();
    result?;

    println!(
        "[Game] Final score: {} (level {}, lines {}, pieces {})",
        game.session().score(),
        game.session().level(),
        game.session().lines(),
        game.session().pieces()
    );
    Ok(())
}

fn run(term: &mut TerminalRenderer, game: &mut Game, mut adapter: Option<Adapter>) -> Result<()> {
    let view = GameView::default();
    let mut input_handler = InputHandler::new();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(u64::from(TICK_MS));

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.session().snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_default();

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        input_handler.handle_key_press(key.code);
                    }
                    KeyEventKind::Release => input_handler.handle_key_release(key.code),
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            let controls = input_handler.update(TICK_MS);
            game.frame(controls, adapter.as_mut());
        }
    }
}

fn run_headless(game: &mut Game, adapter: &mut Adapter) {
    let tick_duration = Duration::from_millis(u64::from(TICK_MS));
    let mut next_tick = Instant::now() + tick_duration;

    loop {
        game.frame(Controls::idle(), Some(adapter));

        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        }
        next_tick += tick_duration;
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(1)
}
