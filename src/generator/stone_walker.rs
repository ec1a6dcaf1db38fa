/*
stone_walker.rs

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

//! Generate a Goishi-Hiroi stone walk.
//!
//! The walk starts at `(0, 0)`. Each move goes straight along the current row or column to any
//! free cell, possibly jumping over other free cells, which are then taken as well.
//! A move cannot go back in the direction opposite to the previous move.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::cell::{Cell, Direction};
use super::error::{self, GeneratorError};
use super::path;

/// Generated stone walk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoneBoard {
    pub width: usize,
    pub height: usize,

    /// Stones, in the order they are picked up.
    pub path: Vec<Cell>,
}

/// [`StoneWalker`] object.
pub struct StoneWalker {
    width: usize,
    height: usize,

    /// Maximum number of moves.
    length_limit: usize,
}

impl StoneWalker {
    /// Create the object.
    ///
    /// # Errors
    ///
    /// The board must be at least 1x1.
    pub fn new(width: usize, height: usize, length_limit: usize) -> Result<Self, GeneratorError> {
        error::check_dimensions(width, height, 1, 1)?;
        Ok(Self {
            width,
            height,
            length_limit,
        })
    }

    /// Free cells beyond `from` in the given direction, by increasing coordinate.
    fn candidates(&self, from: Cell, direction: Direction, taken: &HashSet<Cell>) -> Vec<Cell> {
        let cells: Vec<Cell> = match direction {
            Direction::Up => (0..from.j).map(|c| Cell::new(from.i, c)).collect(),
            Direction::Down => ((from.j + 1)..self.height as i32)
                .map(|c| Cell::new(from.i, c))
                .collect(),
            Direction::Left => (0..from.i).map(|c| Cell::new(c, from.j)).collect(),
            Direction::Right => ((from.i + 1)..self.width as i32)
                .map(|c| Cell::new(c, from.j))
                .collect(),
        };
        cells.into_iter().filter(|c| !taken.contains(c)).collect()
    }

    /// Generate and return a random walk.
    ///
    /// The walk stops after `length_limit` moves or when no move is possible.
    pub fn generate(&self, rng: &mut impl Rng) -> StoneBoard {
        let start: Cell = Cell::new(0, 0);
        let mut path: path::Path = path::Path::new(self.length_limit + 1);
        let mut taken: HashSet<Cell> = HashSet::with_capacity(self.width * self.height);
        let mut last_direction: Option<Direction> = None;

        path.push(start);
        taken.insert(start);

        for iteration in 0..self.length_limit {
            let Some(head) = path.head() else { break };
            let current: Cell = path.cell(head);

            let all_candidates: Vec<(Direction, Vec<Cell>)> = Direction::ALL
                .iter()
                .filter(|d| last_direction.is_none_or(|l| **d != l.opposite()))
                .map(|d| (*d, self.candidates(current, *d, &taken)))
                .filter(|(_, c)| !c.is_empty())
                .collect();

            if all_candidates.is_empty() {
                debug!("Stone walk: dead end at {current} after {iteration} moves");
                break;
            }

            let (direction, candidates) =
                &all_candidates[rng.random_range(0..all_candidates.len())];
            let next: Cell = candidates[rng.random_range(0..candidates.len())];

            // The stones that the move passes over cannot be used anymore
            for c in current.segment(next) {
                taken.insert(c);
            }
            path.push(next);
            last_direction = Some(*direction);
            debug!("Stone walk: {current} -> {next} ({direction})");
        }

        StoneBoard {
            width: self.width,
            height: self.height,
            path: path.to_vec(),
        }
    }
}
