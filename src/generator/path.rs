/*
path.rs

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

//! Path of grid cells.
//!
//! The path is stored as an arena of nodes linked by their indexes, so that a run of cells can
//! be replaced in the middle of the path without moving the other nodes.
//! Nodes that are removed stay in the arena but are no longer linked.

use std::collections::HashSet;

use super::cell::Cell;

/// Index of a node in the [`Path`] arena.
pub type NodeId = usize;

#[derive(Debug, Clone)]
struct Node {
    cell: Cell,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Path object.
#[derive(Debug, Default, Clone)]
pub struct Path {
    /// Node arena.
    nodes: Vec<Node>,

    /// Oldest node of the path.
    first: Option<NodeId>,

    /// Most recent node of the path (the current head).
    last: Option<NodeId>,

    /// Stores the visited status of the cells.
    /// Instead of walking the linked nodes, this [`std::collections::HashSet`] speeds up the
    /// lookup.
    visited: HashSet<Cell>,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.to_vec() == other.to_vec()
    }
}

impl Path {
    /// Create a [`Path`] object.
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            first: None,
            last: None,
            visited: HashSet::with_capacity(capacity),
        }
    }

    /// Create a [`Path`] object from a list of cells, oldest first.
    pub fn from_cells(cells: &[Cell]) -> Self {
        let mut path: Path = Path::new(cells.len());
        for c in cells {
            path.push(*c);
        }
        path
    }

    /// Append a cell after the current head and return its node.
    pub fn push(&mut self, cell: Cell) -> NodeId {
        let id: NodeId = self.nodes.len();
        self.nodes.push(Node {
            cell,
            prev: self.last,
            next: None,
        });
        match self.last {
            Some(l) => self.nodes[l].next = Some(id),
            None => self.first = Some(id),
        }
        self.last = Some(id);
        self.visited.insert(cell);
        id
    }

    /// Replace the nodes strictly between `tail` and `head` by the given cells.
    ///
    /// `tail` must come before `head` in the path. The new cells are linked in order, the first
    /// one right after `tail`. Return the cells that were removed.
    pub fn splice(&mut self, tail: NodeId, head: NodeId, cells: &[Cell]) -> Vec<Cell> {
        let mut removed: Vec<Cell> = Vec::new();
        let mut cursor: Option<NodeId> = self.nodes[tail].next;
        while let Some(id) = cursor {
            if id == head {
                break;
            }
            let cell: Cell = self.nodes[id].cell;
            self.visited.remove(&cell);
            removed.push(cell);
            cursor = self.nodes[id].next;
        }

        let mut previous: NodeId = tail;
        for c in cells {
            let id: NodeId = self.nodes.len();
            self.nodes.push(Node {
                cell: *c,
                prev: Some(previous),
                next: None,
            });
            self.nodes[previous].next = Some(id);
            self.visited.insert(*c);
            previous = id;
        }
        self.nodes[previous].next = Some(head);
        self.nodes[head].prev = Some(previous);
        removed
    }

    /// Number of cells in the path.
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Whether the cell is in the path or not.
    pub fn contains(&self, cell: Cell) -> bool {
        self.visited.contains(&cell)
    }

    /// Node of the current head (most recent cell).
    pub fn head(&self) -> Option<NodeId> {
        self.last
    }

    /// Node of the oldest cell.
    #[cfg(test)]
    pub fn first(&self) -> Option<NodeId> {
        self.first
    }

    /// Cell stored in the node.
    pub fn cell(&self, id: NodeId) -> Cell {
        self.nodes[id].cell
    }

    /// Node before the given node (older).
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].prev
    }

    /// Return the cells, oldest first.
    pub fn to_vec(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = Vec::with_capacity(self.len());
        let mut cursor: Option<NodeId> = self.first;
        while let Some(id) = cursor {
            cells.push(self.nodes[id].cell);
            cursor = self.nodes[id].next;
        }
        cells
    }

    /// Return the nodes from the head back to the oldest node.
    pub fn history(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = Vec::with_capacity(self.len());
        let mut cursor: Option<NodeId> = self.last;
        while let Some(id) = cursor {
            ids.push(id);
            cursor = self.nodes[id].prev;
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &[(i32, i32)]) -> Vec<Cell> {
        v.iter().map(|c| Cell::from(*c)).collect()
    }

    #[test]
    fn push_and_history() {
        let path: Path = Path::from_cells(&cells(&[(0, 0), (1, 0), (1, 1)]));
        assert_eq!(path.len(), 3);
        assert!(path.contains(Cell::new(1, 0)));
        assert!(!path.contains(Cell::new(0, 1)));
        let history: Vec<Cell> = path.history().iter().map(|id| path.cell(*id)).collect();
        assert_eq!(history, cells(&[(1, 1), (1, 0), (0, 0)]));
        assert_eq!(path.cell(path.head().unwrap()), Cell::new(1, 1));
    }

    #[test]
    fn splice_replaces_the_inner_run() {
        let mut path: Path = Path::from_cells(&cells(&[(0, 0), (0, 1), (0, 2), (0, 3)]));
        let tail: NodeId = path.first().unwrap();
        let head: NodeId = path.head().unwrap();
        let removed: Vec<Cell> = path.splice(tail, head, &cells(&[(1, 0), (1, 1), (1, 2), (1, 3)]));

        assert_eq!(removed, cells(&[(0, 1), (0, 2)]));
        assert_eq!(
            path.to_vec(),
            cells(&[(0, 0), (1, 0), (1, 1), (1, 2), (1, 3), (0, 3)])
        );
        assert_eq!(path.len(), 6);
        assert!(!path.contains(Cell::new(0, 2)));
        assert_eq!(path.history().len(), 6);
    }

    #[test]
    fn splice_between_neighbors_removes_nothing() {
        let mut path: Path = Path::from_cells(&cells(&[(0, 0), (0, 1)]));
        let tail: NodeId = path.first().unwrap();
        let head: NodeId = path.head().unwrap();
        let removed: Vec<Cell> = path.splice(tail, head, &cells(&[(1, 0), (1, 1)]));
        assert!(removed.is_empty());
        assert_eq!(path.to_vec(), cells(&[(0, 0), (1, 0), (1, 1), (0, 1)]));
    }
}
