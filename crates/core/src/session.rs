//! Session module - one running game
//!
//! A [`Session`] owns the grid, the active piece, score/level counters and
//! the three timers that drive it. It is advanced by [`Session::tick`] with
//! the real elapsed time and the input [`Controls`] for that frame.
//!
//! # Tick order
//!
//! 1. Accumulate elapsed time into the fall, move-repeat and level timers
//! 2. Level-up when the level timer exceeds the interval
//! 3. Rotate, then hard-drop (locks and ends the tick)
//! 4. Left, then right (rate-limited by the move-repeat timer)
//! 5. Soft-drop (one row, resets the fall timer)
//! 6. Gravity when the fall timer exceeds the current threshold
//!
//! Every lock is followed by a line clear and a respawn at (3, 0). A spawn
//! that collides ends the session; the grid is left exactly as the last lock
//! and clear produced it, and later ticks do nothing.

use crate::collision::{drop_distance, lock};
use crate::config::SessionConfig;
use crate::grid::Grid;
use crate::piece::ActivePiece;
use crate::rng::{random_shape, RandomSource, SimpleRng};
use crate::scoring::{calculate_placement_score, calculate_score, next_fall_speed};
use crate::shape::ShapeKind;
use crate::snapshot::GameSnapshot;
use crate::types::{Controls, START_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Falling,
    GameOver,
}

/// What happened when a piece locked (consumed by observers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockEvent {
    pub kind: ShapeKind,
    /// Rows descended by the final drop (full distance for hard drop, 1 for gravity)
    pub distance: u32,
    pub hard_drop: bool,
    pub placement_score: u32,
    pub lines_cleared: u32,
    pub line_clear_score: u32,
    /// The respawn after this lock collided
    pub game_over: bool,
}

/// Summary of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TickReport {
    pub locks: u32,
    pub lines_cleared: u32,
    pub score_delta: u32,
    pub leveled_up: bool,
    pub game_over: bool,
}

#[derive(Debug, Clone)]
pub struct Session<R: RandomSource = SimpleRng> {
    grid: Grid,
    active: Option<ActivePiece>,
    phase: Phase,
    config: SessionConfig,
    rng: R,
    score: u32,
    level: u32,
    lines: u32,
    pieces: u32,
    fall_timer_ms: u32,
    move_timer_ms: u32,
    level_timer_ms: u32,
    fall_speed_ms: f64,
    last_event: Option<LockEvent>,
}

impl Session<SimpleRng> {
    /// Session with default timing and a seeded LCG
    pub fn with_seed(seed: u32) -> Self {
        Self::new(SessionConfig::default(), SimpleRng::new(seed))
    }
}

impl<R: RandomSource> Session<R> {
    /// Start a session on an empty grid and spawn the first piece.
    pub fn new(config: SessionConfig, rng: R) -> Self {
        Self::with_grid(Grid::new(), config, rng)
    }

    /// Start a session on a prepared grid.
    ///
    /// If the first spawn collides the session begins in `GameOver`.
    /// Panics if the grid holds a full row; a live session never has one.
    pub fn with_grid(grid: Grid, config: SessionConfig, rng: R) -> Self {
        for y in 0..usize::from(grid.height()) {
            assert!(
                !grid.is_row_full(y),
                "with_grid: row {} is already full",
                y
            );
        }
        let mut session = Self {
            grid,
            active: None,
            phase: Phase::Falling,
            fall_speed_ms: config.fall_speed_ms,
            config,
            rng,
            score: 0,
            level: START_LEVEL,
            lines: 0,
            pieces: 0,
            fall_timer_ms: 0,
            move_timer_ms: 0,
            level_timer_ms: 0,
            last_event: None,
        };
        session.spawn();
        session
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Total rows cleared this session
    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Total pieces locked this session
    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    /// Current gravity threshold in ms
    pub fn fall_speed_ms(&self) -> f64 {
        self.fall_speed_ms
    }

    pub fn fall_timer_ms(&self) -> u32 {
        self.fall_timer_ms
    }

    pub fn move_timer_ms(&self) -> u32 {
        self.move_timer_ms
    }

    pub fn level_timer_ms(&self) -> u32 {
        self.level_timer_ms
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Advance the session by `elapsed_ms` with the given input.
    pub fn tick(&mut self, elapsed_ms: u32, controls: &Controls) -> TickReport {
        let mut report = TickReport::default();
        if self.phase == Phase::GameOver {
            report.game_over = true;
            return report;
        }

        self.fall_timer_ms = self.fall_timer_ms.saturating_add(elapsed_ms);
        self.move_timer_ms = self.move_timer_ms.saturating_add(elapsed_ms);
        self.level_timer_ms = self.level_timer_ms.saturating_add(elapsed_ms);

        if self.level_timer_ms > self.config.level_up_interval_ms {
            self.level_timer_ms = 0;
            self.level = self.level.saturating_add(1);
            self.fall_speed_ms = next_fall_speed(
                self.fall_speed_ms,
                self.config.fall_speed_scale,
                self.config.min_fall_speed_ms,
            );
            report.leveled_up = true;
        }

        let Some(mut piece) = self.active else {
            return report;
        };

        if controls.rotate {
            piece.try_rotate(&self.grid);
        }

        if controls.hard_drop {
            let distance = drop_distance(&self.grid, &piece.shape, piece.x, piece.y);
            piece.y += distance as i8;
            self.lock_and_respawn(piece, distance, true, &mut report);
            return report;
        }

        if controls.left && self.move_timer_ms > self.config.move_delay_ms {
            piece.try_shift(&self.grid, -1, 0);
            self.move_timer_ms = 0;
        }
        if controls.right && self.move_timer_ms > self.config.move_delay_ms {
            piece.try_shift(&self.grid, 1, 0);
            self.move_timer_ms = 0;
        }

        if controls.soft_drop {
            piece.try_shift(&self.grid, 0, 1);
            self.fall_timer_ms = 0;
        }

        if f64::from(self.fall_timer_ms) > self.fall_speed_ms {
            self.fall_timer_ms = 0;
            if !piece.try_shift(&self.grid, 0, 1) {
                self.lock_and_respawn(piece, 1, false, &mut report);
                return report;
            }
        }

        self.active = Some(piece);
        report
    }

    /// Snapshot of the current frame
    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.grid.write_rows(&mut out.grid);
        out.active = self.active.map(Into::into);
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.pieces = self.pieces;
        out.fall_speed_ms = self.fall_speed_ms;
        out.game_over = self.is_game_over();
    }

    fn lock_and_respawn(
        &mut self,
        piece: ActivePiece,
        distance: u32,
        hard_drop: bool,
        report: &mut TickReport,
    ) {
        let placement_score = calculate_placement_score(distance, self.level);
        lock(&mut self.grid, &piece.shape, piece.x, piece.y, piece.color);
        self.active = None;
        self.pieces = self.pieces.saturating_add(1);

        let cleared = self.grid.clear_full_rows().len();
        let line_clear_score = calculate_score(cleared, self.level);
        let gained = placement_score.saturating_add(line_clear_score);
        self.score = self.score.saturating_add(gained);
        self.lines = self.lines.saturating_add(cleared as u32);

        self.spawn();
        let game_over = self.is_game_over();

        report.locks += 1;
        report.lines_cleared += cleared as u32;
        report.score_delta = report.score_delta.saturating_add(gained);
        report.game_over = game_over;

        self.last_event = Some(LockEvent {
            kind: piece.kind,
            distance,
            hard_drop,
            placement_score,
            lines_cleared: cleared as u32,
            line_clear_score,
            game_over,
        });
    }

    fn spawn(&mut self) {
        let piece = ActivePiece::spawn(random_shape(&mut self.rng));
        if piece.collides(&self.grid) {
            self.active = None;
            self.phase = Phase::GameOver;
            return;
        }
        self.active = Some(piece);
    }
}
