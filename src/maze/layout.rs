//! ASCII maze layouts
//!
//! | char | meaning                                     |
//! |------|---------------------------------------------|
//! | `#`  | wall                                        |
//! | `.`  | path with a collectible                     |
//! | `o`  | path with a power collectible               |
//! | ` `  | empty path                                  |
//! | `P`  | agent start (exactly one)                   |
//! | `G`  | pursuer start                               |
//! | `T`  | portal; consecutive `T`s are linked in pairs |
//! | `-`  | path the agent may not enter                |
//!
//! Every marker cell and every path cell that is not part of a straight
//! corridor becomes a graph node; corridors become edges.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::{
    direction::Direction,
    graph::{NodeGraph, NodeId, Vec2},
    world::Collectible,
};
use crate::{Error, Result};

/// Distance between adjacent cell centres.
pub const TILE_SIZE: f64 = 16.0;

/// Layout used when no file is given.
pub const DEFAULT_LAYOUT: &str = "\
###################
#o.......#.......o#
#.##.###.#.###.##.#
#.................#
#.##.#.#####.#.##.#
#....#...#...#....#
####.###.#.###.####
T.......G.......G.T
####.#.#####.#.####
#........P........#
#.##.###.#.###.##.#
#o.#.....G.....#.o#
##.#.#.#####.#.#.##
#....#...#...#....#
#.######.#.######.#
#.................#
###################";

/// Everything needed to (re)start a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeLayout {
    pub graph: NodeGraph,
    pub agent_start: NodeId,
    pub agent_heading: Direction,
    pub pursuer_starts: Vec<NodeId>,
    pub collectibles: Vec<Collectible>,
}

impl MazeLayout {
    /// Layout over an existing graph with no pursuers and no collectibles.
    /// The agent starts heading left.
    pub fn new(graph: NodeGraph, agent_start: NodeId) -> Self {
        Self {
            graph,
            agent_start,
            agent_heading: Direction::Left,
            pursuer_starts: Vec::new(),
            collectibles: Vec::new(),
        }
    }

    pub fn with_heading(mut self, heading: Direction) -> Self {
        self.agent_heading = heading;
        self
    }

    pub fn with_pursuer(mut self, start: NodeId) -> Self {
        self.pursuer_starts.push(start);
        self
    }

    pub fn with_collectible(mut self, collectible: Collectible) -> Self {
        self.collectibles.push(collectible);
        self
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("read layout {:?}", path.as_ref()),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn builtin() -> Result<Self> {
        Self::parse(DEFAULT_LAYOUT)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.chars().collect())
            .collect();
        if rows.is_empty() {
            return Err(Error::InvalidLayout {
                line: 0,
                message: "layout is empty".to_string(),
            });
        }
        let grid = Grid::new(rows);

        let mut graph = NodeGraph::new();
        let mut ids = vec![None; grid.width * grid.height];
        for row in 0..grid.height {
            for col in 0..grid.width {
                if grid.is_node(row, col) {
                    ids[row * grid.width + col] = Some(graph.add_node(cell_center(row, col)));
                }
            }
        }

        let mut agent_start = None;
        let mut pursuer_starts = Vec::new();
        let mut portals = Vec::new();
        let mut collectibles = Vec::new();

        for row in 0..grid.height {
            for col in 0..grid.width {
                let cell = grid.at(row, col);
                let (x, y) = (col as f64 * TILE_SIZE, row as f64 * TILE_SIZE);
                match cell {
                    '.' => collectibles.push(Collectible::pellet(x, y)),
                    'o' => collectibles.push(Collectible::power(x, y)),
                    _ => {}
                }

                let Some(id) = ids[row * grid.width + col] else {
                    continue;
                };
                match cell {
                    'P' if agent_start.is_some() => {
                        return Err(Error::InvalidLayout {
                            line: row + 1,
                            message: "more than one agent start".to_string(),
                        });
                    }
                    'P' => agent_start = Some(id),
                    'G' => pursuer_starts.push(id),
                    'T' => portals.push(id),
                    _ => {}
                }

                for direction in [Direction::Right, Direction::Down] {
                    let Some((other_row, other_col)) = grid.walk(row, col, direction) else {
                        continue;
                    };
                    if let Some(other) = ids[other_row * grid.width + other_col] {
                        graph.connect(id, direction, other)?;
                        if grid.at(other_row, other_col) == '-' {
                            graph.restrict_agent(id, direction)?;
                        }
                        if cell == '-' {
                            graph.restrict_agent(other, direction.opposite())?;
                        }
                    }
                }
            }
        }

        if portals.len() % 2 != 0 {
            return Err(Error::InvalidLayout {
                line: grid.height,
                message: format!("{} portal cells cannot be paired", portals.len()),
            });
        }
        for pair in portals.chunks(2) {
            graph.link_portal(pair[0], pair[1])?;
        }

        let agent_start = agent_start.ok_or(Error::InvalidLayout {
            line: grid.height,
            message: "no agent start 'P'".to_string(),
        })?;

        Ok(Self {
            graph,
            agent_start,
            agent_heading: Direction::Left,
            pursuer_starts,
            collectibles,
        })
    }
}

fn cell_center(row: usize, col: usize) -> Vec2 {
    Vec2::new(col as f64 * TILE_SIZE, row as f64 * TILE_SIZE)
}

struct Grid {
    cells: Vec<Vec<char>>,
    width: usize,
    height: usize,
}

impl Grid {
    fn new(mut cells: Vec<Vec<char>>) -> Self {
        let width = cells.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut cells {
            row.resize(width, '#');
        }
        let height = cells.len();
        Self {
            cells,
            width,
            height,
        }
    }

    fn at(&self, row: usize, col: usize) -> char {
        self.cells[row][col]
    }

    fn is_path(&self, row: usize, col: usize) -> bool {
        self.at(row, col) != '#'
    }

    fn offset(&self, row: usize, col: usize, direction: Direction) -> Option<(usize, usize)> {
        let (next_row, next_col) = match direction {
            Direction::Up => (row.checked_sub(1)?, col),
            Direction::Down => (row + 1, col),
            Direction::Left => (row, col.checked_sub(1)?),
            Direction::Right => (row, col + 1),
            Direction::Stop => return None,
        };
        (next_row < self.height && next_col < self.width).then_some((next_row, next_col))
    }

    fn open(&self, row: usize, col: usize, direction: Direction) -> bool {
        self.offset(row, col, direction)
            .is_some_and(|(r, c)| self.is_path(r, c))
    }

    fn is_node(&self, row: usize, col: usize) -> bool {
        if !self.is_path(row, col) {
            return false;
        }
        if matches!(self.at(row, col), 'P' | 'G' | 'T' | '-') {
            return true;
        }
        let vertical = self.open(row, col, Direction::Up) && self.open(row, col, Direction::Down);
        let horizontal =
            self.open(row, col, Direction::Left) && self.open(row, col, Direction::Right);
        let exits = Direction::CARDINAL
            .into_iter()
            .filter(|&direction| self.open(row, col, direction))
            .count();
        !(exits == 2 && (vertical || horizontal))
    }

    /// Follow a corridor from a node to the next node in `direction`.
    fn walk(&self, row: usize, col: usize, direction: Direction) -> Option<(usize, usize)> {
        let (mut r, mut c) = self.offset(row, col, direction)?;
        loop {
            if !self.is_path(r, c) {
                return None;
            }
            if self.is_node(r, c) {
                return Some((r, c));
            }
            (r, c) = self.offset(r, c, direction)?;
        }
    }
}
