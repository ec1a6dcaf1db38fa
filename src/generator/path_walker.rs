/*
path_walker.rs

Copyright 2025 Hervé Quatremain

This file is part of temple-gen.

temple-gen is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

temple-gen is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
temple-gen. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Generate a random closed path and the maze around it.
//!
//! The path starts as the 2x2 loop in the corner of the board and grows by "nudging": a
//! straight run of the path is pushed sideways by one cell, the new parallel corridor replacing
//! the cells in between.
//! When no run can be pushed anymore, or after a fixed number of iterations, the path is closed
//! into a loop and extra edges are added around it. The path cells that end up with three or
//! more edges are the junctions of the puzzle.

use log::{Level, debug, log_enabled};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::cell::Cell;
use super::edges;
use super::error::{self, GeneratorError};
use super::path::{self, NodeId};

/// Generated maze.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PathBoard {
    pub width: usize,
    pub height: usize,

    /// Path as an ordered list of cells. The first and last cells are connected.
    pub path: Vec<Cell>,

    /// Maze edges.
    pub edges: edges::Edges,
}

impl PathBoard {
    /// Number of edges incident to the cell.
    pub fn degree(&self, cell: Cell) -> usize {
        self.edges.degree(cell)
    }

    /// Path cells with at least three edges, in path order.
    pub fn junctions(&self) -> Vec<Cell> {
        self.path
            .iter()
            .filter(|c| self.degree(**c) >= 3)
            .copied()
            .collect()
    }
}

/// A possible rewrite of the path: the nodes strictly between `tail` and `head` are replaced by
/// `corridor`.
struct Candidate {
    tail: NodeId,
    corridor: Vec<Cell>,
    head: NodeId,
}

/// [`PathWalker`] object.
pub struct PathWalker {
    width: usize,
    height: usize,

    /// Number of rewrites applied during the last generation.
    pub iteration: usize,
}

impl PathWalker {
    /// Create the object.
    ///
    /// # Errors
    ///
    /// The board must be at least 2x2 to hold the initial loop.
    pub fn new(width: usize, height: usize) -> Result<Self, GeneratorError> {
        error::check_dimensions(width, height, 2, 2)?;
        Ok(Self {
            width,
            height,
            iteration: 0,
        })
    }

    /// Whether the cell can receive a new path node.
    fn valid(&self, cell: Cell, path: &path::Path) -> bool {
        cell.in_bounds(self.width, self.height) && !path.contains(cell)
    }

    /// Scan the whole path for runs that can be pushed sideways.
    fn candidates(&self, path: &path::Path) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = Vec::new();
        let history: Vec<NodeId> = path.history();

        for (k, cursor) in history.iter().enumerate() {
            let Some(prev) = path.prev(*cursor) else {
                break;
            };
            let c1: Cell = path.cell(*cursor);
            let i_direction: bool = c1.i == path.cell(prev).i;

            for tail in &history[k + 1..] {
                let c2: Cell = path.cell(*tail);
                if i_direction && c2.i != c1.i {
                    break;
                }
                if !i_direction && c2.j != c1.j {
                    break;
                }

                let tries: [Vec<Cell>; 2] = if c1.i == c2.i {
                    [
                        Cell::new(c2.i + 1, c2.j).segment(Cell::new(c1.i + 1, c1.j)),
                        Cell::new(c2.i - 1, c2.j).segment(Cell::new(c1.i - 1, c1.j)),
                    ]
                } else {
                    [
                        Cell::new(c2.i, c2.j + 1).segment(Cell::new(c1.i, c1.j + 1)),
                        Cell::new(c2.i, c2.j - 1).segment(Cell::new(c1.i, c1.j - 1)),
                    ]
                };

                for corridor in tries {
                    if corridor.iter().all(|c| self.valid(*c, path)) {
                        candidates.push(Candidate {
                            tail: *tail,
                            corridor,
                            head: *cursor,
                        });
                    }
                }
            }
        }
        candidates
    }

    /// Generate and return a random maze.
    pub fn generate(&mut self, rng: &mut impl Rng) -> PathBoard {
        let mut path: path::Path = path::Path::from_cells(&[
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(0, 1),
        ]);

        self.iteration = 0;
        let max_iterations: usize = self.width * self.height * 3 / 4;
        while self.iteration < max_iterations {
            let candidates: Vec<Candidate> = self.candidates(&path);
            if candidates.is_empty() {
                debug!("No more candidates after {} iterations", self.iteration);
                break;
            }

            let chosen: &Candidate = &candidates[rng.random_range(0..candidates.len())];
            let removed: Vec<Cell> = path.splice(chosen.tail, chosen.head, &chosen.corridor);
            debug!(
                "Iteration {}: {} candidates, corridor {:?} replaces {:?}",
                self.iteration,
                candidates.len(),
                chosen.corridor,
                removed
            );
            self.iteration += 1;
        }

        let cells: Vec<Cell> = path.to_vec();
        let mut edges: edges::Edges = edges::Edges::new();

        // Close the loop, then follow the path
        if let (Some(first), Some(last)) = (cells.first(), cells.last()) {
            edges.add(*first, *last);
        }
        for pair in cells.windows(2) {
            edges.add(pair[0], pair[1]);
        }

        self.balance_degrees(&cells, &mut edges, rng);

        if log_enabled!(Level::Debug) {
            debug!("Path ({} cells): {cells:?}", cells.len());
            edges.debug();
        }

        PathBoard {
            width: self.width,
            height: self.height,
            path: cells,
            edges,
        }
    }

    /// Add edges so that path cells tend to have three edges and the other cells two.
    fn balance_degrees(&self, cells: &[Cell], edges: &mut edges::Edges, rng: &mut impl Rng) {
        let on_path: HashSet<Cell> = cells.iter().copied().collect();
        let target = |c: &Cell| -> usize { if on_path.contains(c) { 3 } else { 2 } };

        for i in 0..self.width as i32 {
            for j in 0..self.height as i32 {
                let cell: Cell = Cell::new(i, j);

                let available: Vec<Cell> = cell
                    .neighbors()
                    .into_iter()
                    .filter(|n| {
                        n.in_bounds(self.width, self.height) && edges.degree(*n) < target(n)
                    })
                    .collect();
                let present: Vec<Cell> = edges.connected(cell);
                let desired: usize = target(&cell);

                if present.len() < desired && available.len() >= desired {
                    let options: Vec<Cell> = available
                        .into_iter()
                        .filter(|n| !present.contains(n))
                        .collect();
                    let other: Cell = options[rng.random_range(0..options.len())];
                    edges.add(cell, other);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generate(width: usize, height: usize, seed: u64) -> PathBoard {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(seed);
        PathWalker::new(width, height).unwrap().generate(&mut rng)
    }

    #[test]
    fn degenerate_board_is_rejected() {
        assert!(PathWalker::new(1, 5).is_err());
        assert!(PathWalker::new(5, 0).is_err());
        assert!(PathWalker::new(2, 2).is_ok());
    }

    #[test]
    fn smallest_board_keeps_the_seed_loop() {
        let board: PathBoard = generate(2, 2, 3);
        assert_eq!(
            board.path,
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1), Cell::new(0, 1)]
        );
        assert_eq!(board.edges.len(), 4);
        for (a, b) in [((0, 0), (0, 1)), ((0, 1), (1, 1)), ((1, 1), (1, 0)), ((1, 0), (0, 0))] {
            assert!(board.edges.contains(Cell::from(a), Cell::from(b)));
        }
        assert!(board.junctions().is_empty());
    }

    #[test]
    fn four_by_four_keeps_the_anchored_corner() {
        for seed in 0..50 {
            let board: PathBoard = generate(4, 4, seed);
            // The loop is closed between its two ends, which never move.
            // The inner seed edges can be rewritten by a splice between (1, 0) and (0, 1), so
            // only the edges at the anchored corner are checked.
            assert_eq!(board.path.first(), Some(&Cell::new(0, 0)));
            assert_eq!(board.path.last(), Some(&Cell::new(0, 1)));
            assert!(board.edges.contains(Cell::new(0, 0), Cell::new(0, 1)));
            assert!(board.edges.contains(Cell::new(0, 0), Cell::new(1, 0)));
        }
    }

    #[test]
    fn maze_invariants() {
        for seed in 0..100 {
            let w: usize = (seed % 5 + 2) as usize;
            let h: usize = (seed % 4 + 2) as usize;
            let board: PathBoard = generate(w, h, seed);

            let unique: HashSet<Cell> = board.path.iter().copied().collect();
            assert_eq!(unique.len(), board.path.len(), "duplicated cells: {:?}", board.path);

            for c in &board.path {
                assert!(c.in_bounds(w, h), "{c} out of {w}x{h}");
            }
            for pair in board.path.windows(2) {
                assert!(pair[0].is_adjacent(pair[1]));
                assert!(board.edges.contains(pair[0], pair[1]));
                assert!(board.edges.contains(pair[1], pair[0]));
            }
            for e in board.edges.iter() {
                let (a, b) = e.cells();
                assert!(a.is_adjacent(b));
                assert!(a.in_bounds(w, h) && b.in_bounds(w, h));
                assert!(board.edges.contains(b, a));
            }
        }
    }

    #[test]
    fn degrees_stay_under_their_target() {
        for seed in 0..60 {
            let board: PathBoard = generate(6, 6, seed);
            let on_path: HashSet<Cell> = board.path.iter().copied().collect();
            for i in 0..6 {
                for j in 0..6 {
                    let c: Cell = Cell::new(i, j);
                    if on_path.contains(&c) {
                        assert!((2..=3).contains(&board.degree(c)));
                    } else {
                        assert!(board.degree(c) <= 2);
                    }
                }
            }
            for junction in board.junctions() {
                assert!(on_path.contains(&junction));
                assert_eq!(board.degree(junction), 3);
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        assert_eq!(generate(5, 5, 11), generate(5, 5, 11));
    }

    #[test]
    fn path_grows_on_larger_boards() {
        let board: PathBoard = generate(6, 6, 5);
        assert!(board.path.len() > 4);
        assert_eq!(board.path.len() % 2, 0);
    }
}
