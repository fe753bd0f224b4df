//! End-to-end scenarios for the simulation core.

use qtetris::core::{
    check_collision, clear_lines, lock, Grid, ScriptedSource, Session, SessionConfig, ShapeKind,
};
use qtetris::types::{Command, Controls, GRID_HEIGHT};

fn o_session(grid: Grid) -> Session<ScriptedSource> {
    Session::with_grid(grid, SessionConfig::default(), ScriptedSource::repeat(ShapeKind::O))
}

/// Walk the active piece to column `x` and hard-drop it; returns rows cleared.
fn place_at(session: &mut Session<ScriptedSource>, x: i8) -> u32 {
    let mut guard = 0;
    while session.active().map(|p| p.x) != Some(x) {
        let current = session.active().map(|p| p.x).unwrap_or(x);
        let command = if current > x {
            Command::MoveLeft
        } else {
            Command::MoveRight
        };
        session.tick(101, &Controls::only(command));
        guard += 1;
        assert!(guard < 20, "piece stuck on its way to column {}", x);
    }
    session
        .tick(1, &Controls::only(Command::HardDrop))
        .lines_cleared
}

#[test]
fn o_pieces_across_the_floor_clear_two_rows_once() {
    let mut session = o_session(Grid::new());
    let mut clear_events = 0;
    let mut cleared = 0;
    for x in [0, 2, 4, 6, 8] {
        let n = place_at(&mut session, x);
        if n > 0 {
            clear_events += 1;
            cleared += n;
        }
    }

    assert_eq!(clear_events, 1);
    assert_eq!(cleared, 2);
    assert_eq!(session.lines(), 2);
    assert_eq!(session.grid().height(), GRID_HEIGHT);
    assert_eq!(session.grid().filled_count(), 0);
    assert!(!session.is_game_over());
}

#[test]
fn single_o_completes_a_prefilled_floor() {
    let mut grid = Grid::new();
    for x in 2..10 {
        grid.set(x, 19, 1);
    }
    let mut session = o_session(grid);

    assert_eq!(place_at(&mut session, 0), 1);
    assert_eq!(session.grid().height(), GRID_HEIGHT);
    // The O's upper half drops into the bottom row.
    assert_eq!(session.grid().get(0, 19), Some(2));
    assert_eq!(session.grid().get(1, 19), Some(2));
    assert_eq!(session.grid().filled_count(), 2);
}

#[test]
fn pure_functions_reproduce_the_floor_clear() {
    let mut grid = Grid::new();
    let o = ShapeKind::O.shape();
    for x in [0, 2, 4, 6, 8] {
        assert!(!check_collision(&grid, &o, x, 18));
        lock(&mut grid, &o, x, 18, ShapeKind::O.color());
    }
    assert!(!check_collision(&grid, &o, 0, 16));
    assert!(check_collision(&grid, &o, 0, 17));

    let (cleared_grid, count) = clear_lines(&grid);
    assert_eq!(count, 2);
    assert_eq!(cleared_grid.height(), GRID_HEIGHT);
    assert_eq!(cleared_grid.filled_count(), 0);
    // The input grid is untouched.
    assert_eq!(grid.filled_count(), 20);
}

#[test]
fn spawn_collision_is_game_over_without_grid_changes() {
    let mut grid = Grid::new();
    grid.set(3, 0, 4);
    grid.set(9, 19, 6);
    let before = grid.clone();

    let mut session = o_session(grid);
    assert!(session.is_game_over());
    assert!(session.active().is_none());

    let report = session.tick(16, &Controls::only(Command::HardDrop));
    assert!(report.game_over);
    assert_eq!(session.grid(), &before);
    assert_eq!(session.score(), 0);
    assert_eq!(session.pieces(), 0);

    let snap = session.snapshot();
    assert!(snap.game_over);
    assert!(snap.active.is_none());
    assert_eq!(snap.grid[0][3], 4);
}

#[test]
fn seeded_sessions_replay_identically() {
    let script = [
        Controls::only(Command::MoveLeft),
        Controls::only(Command::Rotate),
        Controls::idle(),
        Controls::only(Command::MoveRight),
        Controls::only(Command::HardDrop),
    ];
    let mut a = Session::with_seed(2024);
    let mut b = Session::with_seed(2024);
    for i in 0..2000 {
        let controls = &script[i % script.len()];
        assert_eq!(a.tick(16, controls), b.tick(16, controls));
    }
    assert_eq!(a.snapshot(), b.snapshot());
}
