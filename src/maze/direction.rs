//! Absolute and heading-relative directions
//!
//! Absolute directions live in screen coordinates (y grows downward). A
//! [`RelativeDirection`] is only meaningful together with a heading; the
//! conversions here are the only place where the two are related.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Movement direction in fixed world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Stop,
}

impl Direction {
    /// The four moving directions, in the order the graph stores neighbours.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Direction negation. `Stop` is its own opposite.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Stop => Direction::Stop,
        }
    }

    /// Quarter turn clockwise on screen (UP becomes RIGHT).
    pub fn rotate_cw(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Stop => Direction::Stop,
        }
    }

    /// Quarter turn counter-clockwise on screen (UP becomes LEFT).
    pub fn rotate_ccw(self) -> Direction {
        self.rotate_cw().opposite()
    }

    /// Index into per-direction arrays, `None` for `Stop`.
    pub fn index(self) -> Option<usize> {
        match self {
            Direction::Up => Some(0),
            Direction::Down => Some(1),
            Direction::Left => Some(2),
            Direction::Right => Some(3),
            Direction::Stop => None,
        }
    }

    /// Unit step in screen coordinates.
    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::Stop => (0.0, 0.0),
        }
    }

    fn as_heading(self) -> Direction {
        // Relative conversions treat a stopped agent as facing up.
        if self == Direction::Stop {
            Direction::Up
        } else {
            self
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
            Direction::Stop => "STOP",
        };
        f.write_str(name)
    }
}

/// Movement direction expressed relative to a heading
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RelativeDirection {
    Forward,
    Backward,
    Right,
    Left,
}

impl RelativeDirection {
    /// Canonical evaluation order. Candidate lists and tie-breaks follow it.
    pub const ALL: [RelativeDirection; 4] = [
        RelativeDirection::Forward,
        RelativeDirection::Backward,
        RelativeDirection::Right,
        RelativeDirection::Left,
    ];

    pub fn index(self) -> usize {
        match self {
            RelativeDirection::Forward => 0,
            RelativeDirection::Backward => 1,
            RelativeDirection::Right => 2,
            RelativeDirection::Left => 3,
        }
    }

    /// Absolute direction this relative direction denotes under `heading`.
    ///
    /// A `Stop` heading is treated as `Up`.
    pub fn to_absolute(self, heading: Direction) -> Direction {
        let heading = heading.as_heading();
        match self {
            RelativeDirection::Forward => heading,
            RelativeDirection::Backward => heading.opposite(),
            RelativeDirection::Right => heading.rotate_cw(),
            RelativeDirection::Left => heading.rotate_ccw(),
        }
    }

    /// Inverse of [`RelativeDirection::to_absolute`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDirection`] when `absolute` is `Stop`.
    pub fn from_absolute(heading: Direction, absolute: Direction) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|relative| {
                absolute != Direction::Stop && relative.to_absolute(heading) == absolute
            })
            .ok_or(Error::InvalidDirection { heading, absolute })
    }

    /// True for the FORWARD/BACKWARD and LEFT/RIGHT pairs, in either order.
    pub fn is_opposite(self, other: RelativeDirection) -> bool {
        matches!(
            (self, other),
            (RelativeDirection::Forward, RelativeDirection::Backward)
                | (RelativeDirection::Backward, RelativeDirection::Forward)
                | (RelativeDirection::Left, RelativeDirection::Right)
                | (RelativeDirection::Right, RelativeDirection::Left)
        )
    }

    pub fn short_name(self) -> char {
        match self {
            RelativeDirection::Forward => 'F',
            RelativeDirection::Backward => 'B',
            RelativeDirection::Right => 'R',
            RelativeDirection::Left => 'L',
        }
    }
}

impl fmt::Display for RelativeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelativeDirection::Forward => "FORWARD",
            RelativeDirection::Backward => "BACKWARD",
            RelativeDirection::Right => "RIGHT",
            RelativeDirection::Left => "LEFT",
        };
        f.write_str(name)
    }
}
