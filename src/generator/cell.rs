/*
cell.rs

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

//! Grid coordinates and cardinal directions.
//!
//! The first coordinate (`i`) grows to the right, the second one (`j`) grows downward.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, FromRepr};

/// Grid coordinate.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub i: i32,
    pub j: i32,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.i, self.j)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((i, j): (i32, i32)) -> Self {
        Self { i, j }
    }
}

impl Cell {
    /// Create a [`Cell`] object.
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Manhattan distance between the two cells.
    pub fn distance(&self, other: Cell) -> u32 {
        self.i.abs_diff(other.i) + self.j.abs_diff(other.j)
    }

    /// Whether the two cells are grid neighbors.
    pub fn is_adjacent(&self, other: Cell) -> bool {
        self.distance(other) == 1
    }

    /// Whether the cell lies in the `[0, width) x [0, height)` rectangle.
    pub fn in_bounds(&self, width: usize, height: usize) -> bool {
        self.i >= 0 && self.j >= 0 && (self.i as usize) < width && (self.j as usize) < height
    }

    /// The four neighbors of the cell, in [`Direction::ALL`] order.
    pub fn neighbors(&self) -> [Cell; 4] {
        Direction::ALL.map(|d| d.step(*self))
    }

    /// All the cells on the straight segment from `self` to `other`, both ends included.
    ///
    /// The segment starts at `self`. If the two cells are not on the same row or column, the
    /// returned list is empty.
    pub fn segment(&self, other: Cell) -> Vec<Cell> {
        if self.i == other.i {
            let step: i32 = if other.j < self.j { -1 } else { 1 };
            (0..=self.j.abs_diff(other.j) as i32)
                .map(|delta| Cell::new(self.i, self.j + step * delta))
                .collect()
        } else if self.j == other.j {
            let step: i32 = if other.i < self.i { -1 } else { 1 };
            (0..=self.i.abs_diff(other.i) as i32)
                .map(|delta| Cell::new(self.i + step * delta, self.j))
                .collect()
        } else {
            Vec::new()
        }
    }
}

/// Cardinal directions.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    FromRepr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[repr(usize)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    /// Every direction, in the order the generators scan them.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
    ];

    /// Return the opposite direction.
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    /// Return the neighbor of `cell` in this direction.
    pub fn step(&self, cell: Cell) -> Cell {
        match self {
            Direction::Up => Cell::new(cell.i, cell.j - 1),
            Direction::Down => Cell::new(cell.i, cell.j + 1),
            Direction::Right => Cell::new(cell.i + 1, cell.j),
            Direction::Left => Cell::new(cell.i - 1, cell.j),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_is_ordered_from_start() {
        let s: Vec<Cell> = Cell::new(2, 5).segment(Cell::new(2, 3));
        assert_eq!(s, vec![Cell::new(2, 5), Cell::new(2, 4), Cell::new(2, 3)]);

        let s: Vec<Cell> = Cell::new(0, 1).segment(Cell::new(2, 1));
        assert_eq!(s, vec![Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)]);

        assert_eq!(Cell::new(1, 1).segment(Cell::new(1, 1)), vec![Cell::new(1, 1)]);
        assert!(Cell::new(0, 0).segment(Cell::new(1, 1)).is_empty());
    }

    #[test]
    fn opposite_steps_cancel() {
        let origin: Cell = Cell::new(3, -2);
        for d in Direction::ALL {
            assert_eq!(d.opposite().step(d.step(origin)), origin);
            assert_eq!(d.opposite().opposite(), d);
            assert!(origin.is_adjacent(d.step(origin)));
        }
        assert_eq!(Direction::from_repr(2), Some(Direction::Right));
        assert_eq!(Direction::Left.to_string(), "left");
    }

    #[test]
    fn bounds() {
        assert!(Cell::new(0, 0).in_bounds(1, 1));
        assert!(!Cell::new(1, 0).in_bounds(1, 1));
        assert!(!Cell::new(0, -1).in_bounds(4, 4));
        assert!(Cell::new(3, 2).in_bounds(4, 3));
    }
}
