//! Grid-selection game driven by facial landmark tracking.
//!
//! The tracker (camera + face mesh) lives outside this crate. Each frame it
//! hands over two normalized eye landmarks; [`cell_for_landmarks`] maps them
//! onto the grid and [`GridGame::observe`] advances the game.

use std::fmt;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A normalized landmark position, `0.0..=1.0` on both axes for points in frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Map the midpoint of two eye landmarks onto a `grid_size` x `grid_size` grid.
///
/// Coordinates are scaled then truncated toward zero, so a midpoint just left
/// of the frame edge still lands in column 0. Returns `None` when the midpoint
/// falls outside the grid.
pub fn cell_for_landmarks(left: Landmark, right: Landmark, grid_size: u32) -> Option<Cell> {
    let scale = grid_size as f32;
    let col = ((left.x + right.x) / 2.0 * scale).trunc();
    let row = ((left.y + right.y) / 2.0 * scale).trunc();

    if !(0.0..scale).contains(&col) || !(0.0..scale).contains(&row) {
        return None;
    }
    Some(Cell::new(row as u32, col as u32))
}

/// Result of feeding one highlighted cell into the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Highlighted cell was not the target.
    Miss,
    /// Target hit; a new target has been placed.
    Hit { next_target: Cell },
    /// Final target hit, or the game had already ended.
    GameOver,
}

/// State of one game session.
#[derive(Debug)]
pub struct GridGame<R> {
    grid_size: u32,
    total_targets: u32,
    target: Cell,
    highlighted: Option<Cell>,
    attempts: u32,
    hits: u32,
    rng: R,
}

impl<R: Rng> GridGame<R> {
    /// Start a game, placing the first target.
    pub fn new(grid_size: u32, total_targets: u32, rng: R) -> Result<Self, CoreError> {
        if grid_size == 0 {
            return Err(CoreError::InvalidInput("grid size must be positive".to_string()));
        }
        if total_targets == 0 {
            return Err(CoreError::InvalidInput(
                "target count must be positive".to_string(),
            ));
        }
        Ok(Self::start(grid_size, total_targets, rng))
    }

    fn start(grid_size: u32, total_targets: u32, rng: R) -> Self {
        let mut game = Self {
            grid_size,
            total_targets,
            target: Cell::new(0, 0),
            highlighted: None,
            attempts: 0,
            hits: 0,
            rng,
        };
        game.place_target();
        game
    }

    fn place_target(&mut self) {
        let row = self.rng.gen_range(0..self.grid_size);
        let col = self.rng.gen_range(0..self.grid_size);
        self.target = Cell::new(row, col);
    }

    /// Highlight `cell` and score it against the current target.
    ///
    /// Every observation counts as an attempt, including repeated frames on
    /// the same cell.
    pub fn observe(&mut self, cell: Cell) -> Observation {
        if self.is_finished() {
            return Observation::GameOver;
        }

        self.highlighted = Some(cell);
        self.attempts += 1;

        if cell != self.target {
            return Observation::Miss;
        }

        self.hits += 1;
        if self.is_finished() {
            return Observation::GameOver;
        }
        self.place_target();
        Observation::Hit {
            next_target: self.target,
        }
    }

    /// Map a landmark pair and observe the resulting cell, if any.
    pub fn observe_landmarks(&mut self, left: Landmark, right: Landmark) -> Option<Observation> {
        cell_for_landmarks(left, right, self.grid_size).map(|cell| self.observe(cell))
    }

    pub fn is_finished(&self) -> bool {
        self.hits >= self.total_targets
    }

    pub fn target(&self) -> Cell {
        self.target
    }

    pub fn highlighted(&self) -> Option<Cell> {
        self.highlighted
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Performance so far, given the time since the game started.
    pub fn metrics(&self, elapsed: Duration) -> GameMetrics {
        GameMetrics::new(self.hits, self.attempts, elapsed)
    }
}

/// Accuracy and speed figures shown during and after a game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameMetrics {
    pub hits: u32,
    pub attempts: u32,
    pub accuracy_pct: f64,
    pub elapsed: Duration,
    pub hits_per_sec: f64,
}

impl GameMetrics {
    pub fn new(hits: u32, attempts: u32, elapsed: Duration) -> Self {
        let accuracy_pct = if attempts > 0 {
            f64::from(hits) / f64::from(attempts) * 100.0
        } else {
            0.0
        };
        let secs = elapsed.as_secs_f64();
        let hits_per_sec = if secs > 0.0 { f64::from(hits) / secs } else { 0.0 };

        Self {
            hits,
            attempts,
            accuracy_pct,
            elapsed,
            hits_per_sec,
        }
    }

    /// One-line status for the in-game overlay.
    pub fn status_line(&self) -> String {
        format!(
            "Accuracy: {:.2}%  |  Time: {:.2} sec  |  Speed: {:.2} hits/sec",
            self.accuracy_pct,
            self.elapsed.as_secs_f64(),
            self.hits_per_sec
        )
    }
}

impl fmt::Display for GameMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Game Over!")?;
        writeln!(f)?;
        writeln!(f, "Targets Hit: {}", self.hits)?;
        writeln!(f, "Total Attempts: {}", self.attempts)?;
        writeln!(f, "Accuracy: {:.2}%", self.accuracy_pct)?;
        writeln!(f, "Total Time: {:.2} sec", self.elapsed.as_secs_f64())?;
        write!(f, "Speed: {:.2} hits/sec", self.hits_per_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game(total_targets: u32) -> GridGame<StdRng> {
        GridGame::new(5, total_targets, StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn test_landmarks_map_to_cell() {
        let cell = cell_for_landmarks(Landmark::new(0.125, 0.5), Landmark::new(0.375, 0.75), 5);
        // midpoint (0.25, 0.625) -> col 1, row 3
        assert_eq!(cell, Some(Cell::new(3, 1)));
    }

    #[test]
    fn test_landmarks_outside_grid() {
        assert_eq!(
            cell_for_landmarks(Landmark::new(1.0, 0.5), Landmark::new(1.2, 0.5), 5),
            None
        );
        assert_eq!(
            cell_for_landmarks(Landmark::new(-0.5, 0.5), Landmark::new(-0.3, 0.5), 5),
            None
        );
        assert_eq!(
            cell_for_landmarks(Landmark::new(f32::NAN, 0.5), Landmark::new(0.1, 0.5), 5),
            None
        );
    }

    #[test]
    fn test_slightly_negative_truncates_to_zero() {
        let cell = cell_for_landmarks(Landmark::new(-0.05, 0.0), Landmark::new(0.0, 0.0), 5);
        assert_eq!(cell, Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_rejects_zero_sizes() {
        assert!(GridGame::new(0, 5, StdRng::seed_from_u64(1)).is_err());
        assert!(GridGame::new(5, 0, StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn test_target_within_grid() {
        let game = game(3);
        let target = game.target();
        assert!(target.row < 5 && target.col < 5);
    }

    #[test]
    fn test_miss_counts_attempt() {
        let mut game = game(3);
        let target = game.target();
        let other = Cell::new((target.row + 1) % 5, target.col);

        assert_eq!(game.observe(other), Observation::Miss);
        assert_eq!(game.highlighted(), Some(other));
        let metrics = game.metrics(Duration::from_secs(1));
        assert_eq!(metrics.attempts, 1);
        assert_eq!(metrics.hits, 0);
        assert_eq!(metrics.accuracy_pct, 0.0);
    }

    #[test]
    fn test_hits_until_game_over() {
        let mut game = game(2);

        let first = game.target();
        assert!(matches!(game.observe(first), Observation::Hit { .. }));
        assert!(!game.is_finished());

        let second = game.target();
        assert_eq!(game.observe(second), Observation::GameOver);
        assert!(game.is_finished());

        // Further frames do not change the score.
        assert_eq!(game.observe(second), Observation::GameOver);
        assert_eq!(game.metrics(Duration::from_secs(4)).attempts, 2);
    }

    #[test]
    fn test_observe_landmarks_skips_out_of_grid() {
        let mut game = game(2);
        assert_eq!(
            game.observe_landmarks(Landmark::new(2.0, 2.0), Landmark::new(2.0, 2.0)),
            None
        );
        assert_eq!(game.metrics(Duration::ZERO).attempts, 0);
    }

    #[test]
    fn test_metrics() {
        let metrics = GameMetrics::new(3, 4, Duration::from_secs(2));
        assert_eq!(metrics.accuracy_pct, 75.0);
        assert_eq!(metrics.hits_per_sec, 1.5);
        assert_eq!(
            metrics.status_line(),
            "Accuracy: 75.00%  |  Time: 2.00 sec  |  Speed: 1.50 hits/sec"
        );

        let summary = metrics.to_string();
        assert!(summary.starts_with("Game Over!"));
        assert!(summary.contains("Targets Hit: 3"));
        assert!(summary.contains("Total Attempts: 4"));
    }

    #[test]
    fn test_metrics_zero_elapsed() {
        let metrics = GameMetrics::new(0, 0, Duration::ZERO);
        assert_eq!(metrics.accuracy_pct, 0.0);
        assert_eq!(metrics.hits_per_sec, 0.0);
    }
}
