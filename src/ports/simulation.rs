//! Simulation port - the game world the agent plays in
//!
//! The learning core never advances entities itself. It reads a
//! [`WorldView`] once per tick, issues at most one heading command and asks
//! the simulation to advance.

use crate::maze::{Direction, WorldView};

/// A tick-driven maze-chase game
///
/// # Lifecycle
///
/// 1. `start()` - fresh game: full collectible layout, all lives
/// 2. repeatedly `view()`, `command(..)`, `tick()`
/// 3. after the agent dies with lives remaining, `reset_level()` puts the
///    entities back at their starts while keeping consumed collectibles
///    consumed
pub trait Simulation {
    /// Start a new game from scratch.
    fn start(&mut self);

    /// Reset entity positions after a life is lost.
    fn reset_level(&mut self);

    /// Borrow the current world state.
    fn view(&self) -> WorldView<'_>;

    /// Desired heading for the agent. Illegal headings, including
    /// [`Direction::Stop`], leave the current heading unchanged.
    fn command(&mut self, heading: Direction);

    /// Advance the world by one tick.
    fn tick(&mut self);

    /// Heading the agent holds when a game or life starts.
    fn initial_heading(&self) -> Direction;

    /// Ticks per simulated second, used to report survival time.
    fn tick_rate(&self) -> f64 {
        60.0
    }
}
