/*
edges.rs

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

//! Undirected edges between grid cells.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::cell::Cell;

/// Unordered pair of cells.
///
/// The two cells are stored sorted so that `(a, b)` and `(b, a)` are the same edge.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(Cell, Cell);

impl Edge {
    /// Create the canonical [`Edge`] between the two cells.
    pub fn new(a: Cell, b: Cell) -> Self {
        if a <= b { Edge(a, b) } else { Edge(b, a) }
    }

    /// Return the two cells of the edge.
    pub fn cells(&self) -> (Cell, Cell) {
        (self.0, self.1)
    }
}

/// Represent the edges of a grid graph.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Edges {
    edges: BTreeSet<Edge>,
}

impl Edges {
    /// Create the edge object that stores all the edges.
    pub fn new() -> Self {
        Self {
            edges: BTreeSet::new(),
        }
    }

    /// Add the edge between the two cells.
    pub fn add(&mut self, a: Cell, b: Cell) {
        self.edges.insert(Edge::new(a, b));
    }

    /// Whether the two cells are connected.
    pub fn contains(&self, a: Cell, b: Cell) -> bool {
        self.edges.contains(&Edge::new(a, b))
    }

    /// Number of edges incident to the cell.
    pub fn degree(&self, cell: Cell) -> usize {
        cell.neighbors()
            .iter()
            .filter(|n| self.contains(cell, **n))
            .count()
    }

    /// Neighbors of the cell that are connected to it.
    pub fn connected(&self, cell: Cell) -> Vec<Cell> {
        cell.neighbors()
            .into_iter()
            .filter(|n| self.contains(cell, *n))
            .collect()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over the edges in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Print the edges.
    pub fn debug(&self) {
        let mut s: String = String::new();
        for e in &self.edges {
            let (a, b) = e.cells();
            s.push_str(&format!(" {a}::{b}"));
        }
        debug!("Edges ({}):{s}", self.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_unordered() {
        let mut edges: Edges = Edges::new();
        edges.add(Cell::new(1, 0), Cell::new(0, 0));
        edges.add(Cell::new(0, 0), Cell::new(1, 0));
        assert_eq!(edges.len(), 1);
        assert!(edges.contains(Cell::new(0, 0), Cell::new(1, 0)));
        assert!(edges.contains(Cell::new(1, 0), Cell::new(0, 0)));
        assert_eq!(
            Edge::new(Cell::new(3, 3), Cell::new(3, 2)).cells(),
            (Cell::new(3, 2), Cell::new(3, 3))
        );
    }

    #[test]
    fn degree_counts_incident_edges() {
        let mut edges: Edges = Edges::new();
        let center: Cell = Cell::new(1, 1);
        edges.add(center, Cell::new(1, 0));
        edges.add(center, Cell::new(2, 1));
        edges.add(Cell::new(2, 1), Cell::new(2, 2));
        assert_eq!(edges.degree(center), 2);
        assert_eq!(edges.degree(Cell::new(2, 1)), 2);
        assert_eq!(edges.degree(Cell::new(0, 0)), 0);
        assert_eq!(edges.connected(center), vec![Cell::new(1, 0), Cell::new(2, 1)]);
    }
}
