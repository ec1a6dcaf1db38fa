/*
dungeon.rs

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

//! Assemble puzzle rooms into a dungeon.
//!
//! The dungeon grows from a seed room. Extending a room tries to attach a new room on each side
//! that the room was not entered from. Each new room gets a puzzle of a different type than its
//! parent, sized by its distance from the seed, and is kept only if it does not overlap any
//! existing room.
//!
//! After the requested number of extensions, the rooms that were never extended are pruned,
//! and the key and lock rooms are paired again so that every key opens exactly one lock.
//!
//! # Example
//!
//! ```
//! let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(42);
//! let mut dungeon: DungeonTopology =
//!     DungeonTopology::random(5, NarrativeTemplates::default(), &mut rng)?;
//! dungeon.generate_finite(12, &mut rng)?;
//! ```

use log::{Level, debug, info, log_enabled, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use strum_macros::{Display, FromRepr};

use super::board::BoardTemplate;
use super::cell::{Cell, Direction};
use super::error::GeneratorError;
use super::knight_graph::{KnightGraph, NarrativeTemplates};
use super::names::UniqueNames;
use super::partition::PartitionGenerator;
use super::path_walker::PathWalker;
use super::stone_walker::StoneWalker;
use crate::config;

/// Puzzle types.
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
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[repr(usize)]
pub enum BoardType {
    Hamiltonian,
    GoishiHiroi,
    Altar,
    Rest,
    KeyOrLock,
    Knights,
}

impl BoardType {
    pub const ALL: [BoardType; 6] = [
        BoardType::Hamiltonian,
        BoardType::GoishiHiroi,
        BoardType::Altar,
        BoardType::Rest,
        BoardType::KeyOrLock,
        BoardType::Knights,
    ];
}

/// Side of the maze for a room at the given level.
pub fn hamiltonian_side(level: usize) -> usize {
    (5 * level + 4).isqrt()
}

/// Side of the ice field for a room at the given level. Always odd.
pub fn goishi_hiroi_side(level: usize) -> usize {
    (((5 * level + 5) as f64).sqrt() / 2.0).ceil() as usize * 2 + 1
}

/// Maximum number of moves of the stone walk for a room at the given level.
pub fn goishi_hiroi_steps(level: usize) -> usize {
    3 * level
}

/// Number of altars for a room at the given level.
pub fn altar_buckets(level: usize) -> usize {
    level.div_ceil(3).max(1)
}

/// Number of knight graph expansions for a room at the given level.
pub fn knight_expansions(level: usize) -> usize {
    config::KNIGHT_BASE_EXPANSIONS + level.saturating_sub(5).div_ceil(10)
}

/// Room identifier: the index of the room in [`DungeonTopology::rooms`].
pub type RoomId = usize;

/// Room object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,

    /// Top-left corner.
    pub pos: Cell,

    /// Width and height, from the template.
    pub dim: (usize, usize),

    /// Distance from the seed room, plus the level of the seed room.
    pub level: usize,

    pub board_type: BoardType,

    pub template: BoardTemplate,

    /// Side through which the room was entered. `None` for the seed room.
    pub start_dir: Option<Direction>,

    /// Parent room. `None` for the seed room.
    pub prev: Option<RoomId>,

    /// Neighbor rooms.
    pub exits: BTreeMap<Direction, RoomId>,

    /// Whether the room has already been extended.
    pub extended: bool,
}

impl Room {
    /// Create a [`Room`] object. The exit toward the parent room is set.
    fn new(
        id: RoomId,
        pos: Cell,
        level: usize,
        board_type: BoardType,
        template: BoardTemplate,
        start_dir: Option<Direction>,
        prev: Option<RoomId>,
    ) -> Self {
        let mut exits: BTreeMap<Direction, RoomId> = BTreeMap::new();
        if let (Some(d), Some(p)) = (start_dir, prev) {
            exits.insert(d, p);
        }
        Self {
            id,
            pos,
            dim: (template.width(), template.height()),
            level,
            board_type,
            template,
            start_dir,
            prev,
            exits,
            extended: false,
        }
    }

    /// Whether the bounding boxes of the two rooms overlap. Rooms that touch overlap.
    pub fn intersects(&self, other: &Room) -> bool {
        let (w, h) = (self.dim.0 as i32, self.dim.1 as i32);
        let (ow, oh) = (other.dim.0 as i32, other.dim.1 as i32);
        !(other.pos.i > self.pos.i + w
            || self.pos.i > other.pos.i + ow
            || other.pos.j > self.pos.j + h
            || self.pos.j > other.pos.j + oh)
    }

    /// Door cell on the given side: the middle of the side, just outside the room.
    pub fn door(&self, direction: Direction) -> Cell {
        let (w, h) = (self.dim.0 as i32, self.dim.1 as i32);
        match direction {
            Direction::Up => Cell::new(self.pos.i + w / 2, self.pos.j - 1),
            Direction::Down => Cell::new(self.pos.i + w / 2, self.pos.j + h),
            Direction::Left => Cell::new(self.pos.i - 1, self.pos.j + h / 2),
            Direction::Right => Cell::new(self.pos.i + w, self.pos.j + h / 2),
        }
    }
}

/// Change to the set of unused keys, applied once the room is placed.
#[derive(Debug, Clone, PartialEq)]
enum KeyChange {
    /// A new key is available.
    Mint(String),

    /// The key is now used by a lock.
    Use(String),
}

/// Output of the template factory.
#[derive(Debug, Clone)]
pub struct GeneratedTemplate {
    pub board_type: BoardType,
    pub template: BoardTemplate,
    key_change: Option<KeyChange>,
}

/// [`DungeonTopology`] object.
#[derive(Serialize, Debug, Clone)]
pub struct DungeonTopology {
    rooms: Vec<Room>,

    /// Keys granted by a room, and not required by any lock yet.
    unused_keys: BTreeSet<String>,

    #[serde(skip)]
    key_names: UniqueNames,

    #[serde(skip)]
    templates: NarrativeTemplates,
}

impl DungeonTopology {
    /// Create the dungeon with the seed room at `(0, 0)`.
    pub fn new(
        seed_template: BoardTemplate,
        seed_type: BoardType,
        level: usize,
        templates: NarrativeTemplates,
    ) -> Self {
        let seed: Room = Room::new(0, Cell::new(0, 0), level, seed_type, seed_template, None, None);
        Self {
            rooms: vec![seed],
            unused_keys: BTreeSet::new(),
            key_names: UniqueNames::new(None),
            templates,
        }
    }

    /// Create the dungeon with a random seed room. The seed room is never an ice room.
    ///
    /// # Errors
    ///
    /// Return an error if the seed template cannot be built.
    pub fn random(
        level: usize,
        templates: NarrativeTemplates,
        rng: &mut impl Rng,
    ) -> Result<Self, GeneratorError> {
        // The placeholder seed room is replaced once the factory is available
        let mut dungeon: DungeonTopology =
            Self::new(BoardTemplate::generate_empty(1, 1), BoardType::Rest, level, templates);
        let generated: GeneratedTemplate =
            dungeon.generate_template(level, Some(BoardType::GoishiHiroi), rng)?;
        dungeon.rooms[0] = Room::new(
            0,
            Cell::new(0, 0),
            level,
            generated.board_type,
            generated.template,
            None,
            None,
        );
        dungeon.apply_key_change(generated.key_change);
        Ok(dungeon)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Keys that no lock requires yet.
    pub fn unused_keys(&self) -> &BTreeSet<String> {
        &self.unused_keys
    }

    /// Build a random template of any type but `exclude`, sized for `level`.
    ///
    /// # Errors
    ///
    /// Return an error if a generator rejects its parameters or if the knight declarations
    /// cannot be rendered.
    pub fn generate_template(
        &mut self,
        level: usize,
        exclude: Option<BoardType>,
        rng: &mut impl Rng,
    ) -> Result<GeneratedTemplate, GeneratorError> {
        let candidates: Vec<BoardType> = BoardType::ALL
            .into_iter()
            .filter(|t| Some(*t) != exclude)
            .collect();
        let board_type: BoardType = candidates[rng.random_range(0..candidates.len())];
        let mut key_change: Option<KeyChange> = None;

        let template: BoardTemplate = match board_type {
            BoardType::Hamiltonian => {
                let side: usize = hamiltonian_side(level);
                let board = PathWalker::new(side, side)?.generate(rng);
                BoardTemplate::from_path_board(&board)
            }
            BoardType::GoishiHiroi => {
                let side: usize = goishi_hiroi_side(level);
                let board =
                    StoneWalker::new(side, side, goishi_hiroi_steps(level))?.generate(rng);
                BoardTemplate::from_stone_board(&board)
            }
            BoardType::Altar => {
                let beads = PartitionGenerator::new(altar_buckets(level))?.generate(rng);
                BoardTemplate::from_partition(&beads, rng)
            }
            BoardType::Rest => {
                let w: usize = rng.random_range(1..=config::REST_MAX_WIDTH);
                let h: usize = rng.random_range(1..=config::REST_MAX_HEIGHT);
                BoardTemplate::generate_rest(w, h)
            }
            BoardType::Knights => {
                let graph: KnightGraph = KnightGraph::build(knight_expansions(level), rng);
                BoardTemplate::from_knight_graph(&graph, &self.templates, rng)?
            }
            BoardType::KeyOrLock => {
                let unused: usize = self.unused_keys.len();
                if unused == 0 || rng.random_bool(1.0 / (unused + 1) as f64) {
                    let name: String = self.key_names.generate(rng);
                    let template: BoardTemplate = BoardTemplate::generate_key(&name);
                    key_change = Some(KeyChange::Mint(name));
                    template
                } else {
                    let index: usize = rng.random_range(0..unused);
                    let name: String = self
                        .unused_keys
                        .iter()
                        .nth(index)
                        .cloned()
                        .unwrap_or_default();
                    let template: BoardTemplate = BoardTemplate::generate_lock(&name);
                    key_change = Some(KeyChange::Use(name));
                    template
                }
            }
        };

        debug!(
            "New {board_type} template for level {level}: {}x{}",
            template.width(),
            template.height()
        );
        Ok(GeneratedTemplate {
            board_type,
            template,
            key_change,
        })
    }

    fn apply_key_change(&mut self, key_change: Option<KeyChange>) {
        match key_change {
            Some(KeyChange::Mint(name)) => {
                self.unused_keys.insert(name);
            }
            Some(KeyChange::Use(name)) => {
                self.unused_keys.remove(&name);
            }
            None => (),
        }
    }

    /// Position of a template placed next to `parent` in the given direction.
    ///
    /// The two rooms are two cells apart and centered on each other.
    pub fn place_template(parent: &Room, direction: Direction, template: &BoardTemplate) -> Cell {
        let (pw, ph) = (parent.dim.0 as i32, parent.dim.1 as i32);
        let (cw, ch) = (template.width() as i32, template.height() as i32);
        match direction {
            Direction::Left => Cell::new(parent.pos.i - cw - 2, parent.pos.j + ph / 2 - ch / 2),
            Direction::Right => Cell::new(parent.pos.i + pw + 2, parent.pos.j + ph / 2 - ch / 2),
            Direction::Up => Cell::new(parent.pos.i + pw / 2 - cw / 2, parent.pos.j - ch - 2),
            Direction::Down => Cell::new(parent.pos.i + pw / 2 - cw / 2, parent.pos.j + ph + 2),
        }
    }

    /// Attach new rooms on every side of the room but the one it was entered from.
    ///
    /// Rooms that would overlap an existing room are dropped. Extending a room twice does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Return an error if a template cannot be built.
    pub fn extend(&mut self, id: RoomId, rng: &mut impl Rng) -> Result<(), GeneratorError> {
        let (level, board_type, start_dir) = match self.rooms.get(id) {
            Some(room) if !room.extended => (room.level, room.board_type, room.start_dir),
            _ => return Ok(()),
        };

        for direction in Direction::ALL {
            if Some(direction) == start_dir {
                continue;
            }

            let generated: GeneratedTemplate =
                self.generate_template(level + 1, Some(board_type), rng)?;
            let pos: Cell = Self::place_template(&self.rooms[id], direction, &generated.template);
            let candidate: Room = Room::new(
                self.rooms.len(),
                pos,
                level + 1,
                generated.board_type,
                generated.template,
                Some(direction.opposite()),
                Some(id),
            );

            if self.rooms.iter().any(|r| r.intersects(&candidate)) {
                debug!("Room {id}: no room for a {} on the {direction}", candidate.board_type);
                continue;
            }
            debug!(
                "Room {id}: room {} ({}) on the {direction} at {}",
                candidate.id, candidate.board_type, candidate.pos
            );
            self.rooms[id].exits.insert(direction, candidate.id);
            self.rooms.push(candidate);
            self.apply_key_change(generated.key_change);
        }

        self.rooms[id].extended = true;
        Ok(())
    }

    /// Extend `n` random rooms, prune the dead ends, and pair the keys and locks.
    ///
    /// # Errors
    ///
    /// Return an error if a template cannot be built.
    pub fn generate_finite(&mut self, n: usize, rng: &mut impl Rng) -> Result<(), GeneratorError> {
        for step in 0..n {
            let candidates: Vec<RoomId> = self
                .rooms
                .iter()
                .filter(|r| !r.extended)
                .map(|r| r.id)
                .collect();
            if candidates.is_empty() {
                warn!("No room left to extend after {step} of {n} extensions");
                break;
            }
            let id: RoomId = candidates[rng.random_range(0..candidates.len())];
            self.extend(id, rng)?;
        }

        self.prune();
        self.finalize(rng);

        if log_enabled!(Level::Debug) {
            debug!("Dungeon:\n{self}");
        }
        Ok(())
    }

    /// Remove the rooms that were never extended, except the seed room.
    ///
    /// The room identifiers are renumbered.
    fn prune(&mut self) {
        for i in 0..self.rooms.len() {
            let room: &Room = &self.rooms[i];
            if room.extended || room.prev.is_none() {
                continue;
            }
            if let (Some(prev), Some(start_dir)) = (room.prev, room.start_dir) {
                self.rooms[prev].exits.remove(&start_dir.opposite());
            }
        }

        let mut new_ids: BTreeMap<RoomId, RoomId> = BTreeMap::new();
        for room in &self.rooms {
            if room.extended || room.prev.is_none() {
                new_ids.insert(room.id, new_ids.len());
            }
        }
        let removed: usize = self.rooms.len() - new_ids.len();

        let rooms: Vec<Room> = std::mem::take(&mut self.rooms);
        self.rooms = rooms
            .into_iter()
            .filter_map(|mut room| {
                room.id = *new_ids.get(&room.id)?;
                room.prev = room.prev.and_then(|p| new_ids.get(&p).copied());
                room.exits = room
                    .exits
                    .iter()
                    .filter_map(|(d, r)| new_ids.get(r).map(|n| (*d, *n)))
                    .collect();
                Some(room)
            })
            .collect();
        debug!("Pruned {removed} rooms, {} left", self.rooms.len());
    }

    /// Pair the key and lock rooms with fresh key names.
    ///
    /// A room left without a partner becomes an empty room of the same size.
    pub fn finalize(&mut self, rng: &mut impl Rng) {
        let key_rooms: Vec<RoomId> = self
            .rooms
            .iter()
            .filter(|r| r.board_type == BoardType::KeyOrLock)
            .map(|r| r.id)
            .collect();
        let mut remaining: Vec<usize> = (0..key_rooms.len()).collect();
        let mut pairs: usize = 0;

        while remaining.len() > 1 {
            let i1: usize = remaining.remove(rng.random_range(0..remaining.len()));
            let i2: usize = remaining.remove(rng.random_range(0..remaining.len()));
            let (a, b) = if i1 < i2 { (i1, i2) } else { (i2, i1) };

            let name: String = self.key_names.generate(rng);
            self.rooms[key_rooms[a]].template = BoardTemplate::generate_key(&name);
            self.rooms[key_rooms[b]].template = BoardTemplate::generate_lock(&name);
            pairs += 1;
        }

        if let Some(i) = remaining.first() {
            let room: &mut Room = &mut self.rooms[key_rooms[*i]];
            room.template = BoardTemplate::generate_empty(room.dim.0, room.dim.1);
            debug!("Room {} has no partner and is now empty", room.id);
        }

        self.unused_keys.clear();
        info!("{pairs} key and lock pairs in {} rooms", self.rooms.len());
    }

    /// Pairs of rooms whose bounding boxes overlap.
    pub fn overlaps(&self) -> Vec<(RoomId, RoomId)> {
        let mut overlaps: Vec<(RoomId, RoomId)> = Vec::new();
        for (k, a) in self.rooms.iter().enumerate() {
            for b in &self.rooms[k + 1..] {
                if a.intersects(b) {
                    overlaps.push((a.id, b.id));
                }
            }
        }
        overlaps
    }

    /// Exits that have no matching exit back, or whose doors do not face each other.
    pub fn asymmetric_exits(&self) -> Vec<(RoomId, Direction)> {
        let mut exits: Vec<(RoomId, Direction)> = Vec::new();
        for room in &self.rooms {
            for (direction, target) in &room.exits {
                let linked: bool = self.rooms.get(*target).is_some_and(|t| {
                    t.exits.get(&direction.opposite()) == Some(&room.id)
                        && room.door(*direction).is_adjacent(t.door(direction.opposite()))
                });
                if !linked {
                    exits.push((room.id, *direction));
                }
            }
        }
        exits
    }

    /// Key names granted by a room but required by no room, and the other way around.
    pub fn unmatched_keys(&self) -> Vec<String> {
        let mut keys: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for room in &self.rooms {
            if let Some(name) = &room.template.opts.key_provided {
                keys.entry(name.clone()).or_default().0 += 1;
            }
            if let Some(name) = &room.template.opts.lock_required {
                keys.entry(name.clone()).or_default().1 += 1;
            }
        }
        keys.into_iter()
            .filter(|(_, (k, l))| *k != 1 || *l != 1)
            .map(|(name, _)| name)
            .collect()
    }

    /// Key and lock rooms that ended up without a partner.
    pub fn neutral_key_rooms(&self) -> usize {
        self.rooms
            .iter()
            .filter(|r| {
                r.board_type == BoardType::KeyOrLock
                    && r.template.opts.key_provided.is_none()
                    && r.template.opts.lock_required.is_none()
            })
            .count()
    }
}

impl fmt::Display for DungeonTopology {
    /// Draw the map of the dungeon, with the doors between rooms.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.rooms.is_empty() {
            return Ok(());
        }
        let min_i: i32 = self.rooms.iter().map(|r| r.pos.i).min().unwrap_or(0);
        let min_j: i32 = self.rooms.iter().map(|r| r.pos.j).min().unwrap_or(0);
        let max_i: i32 = self
            .rooms
            .iter()
            .map(|r| r.pos.i + r.dim.0 as i32)
            .max()
            .unwrap_or(0);
        let max_j: i32 = self
            .rooms
            .iter()
            .map(|r| r.pos.j + r.dim.1 as i32)
            .max()
            .unwrap_or(0);

        let mut map: Vec<Vec<char>> =
            vec![vec![' '; (max_i - min_i) as usize]; (max_j - min_j) as usize];
        let mut put = |cell: Cell, c: char| {
            if let Some(x) = map
                .get_mut((cell.j - min_j) as usize)
                .and_then(|row| row.get_mut((cell.i - min_i) as usize))
            {
                *x = c;
            }
        };

        for room in &self.rooms {
            for (j, line) in room.template.to_string().lines().enumerate() {
                for (i, c) in line.chars().enumerate() {
                    put(Cell::new(room.pos.i + i as i32, room.pos.j + j as i32), c);
                }
            }
            for direction in room.exits.keys() {
                put(room.door(*direction), '#');
            }
        }

        for row in map {
            writeln!(f, "{}", row.into_iter().collect::<String>().trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn single_cell_dungeon() -> DungeonTopology {
        DungeonTopology::new(
            BoardTemplate::generate_empty(1, 1),
            BoardType::Rest,
            0,
            NarrativeTemplates::default(),
        )
    }

    #[test]
    fn level_sizes() {
        assert_eq!(hamiltonian_side(0), 2);
        assert_eq!(hamiltonian_side(5), 5);
        assert_eq!(goishi_hiroi_side(0), 5);
        assert_eq!(goishi_hiroi_side(5), 7);
        assert_eq!(goishi_hiroi_steps(4), 12);
        assert_eq!(altar_buckets(0), 1);
        assert_eq!(altar_buckets(4), 2);
        assert_eq!(knight_expansions(5), 2);
        assert_eq!(knight_expansions(6), 3);
        assert_eq!(knight_expansions(16), 4);
    }

    #[test]
    fn placement() {
        let parent: Room = Room::new(
            0,
            Cell::new(10, 20),
            0,
            BoardType::Rest,
            BoardTemplate::generate_empty(9, 7),
            None,
            None,
        );
        let child: BoardTemplate = BoardTemplate::generate_empty(5, 3);
        assert_eq!(
            DungeonTopology::place_template(&parent, Direction::Left, &child),
            Cell::new(3, 22)
        );
        assert_eq!(
            DungeonTopology::place_template(&parent, Direction::Right, &child),
            Cell::new(21, 22)
        );
        assert_eq!(
            DungeonTopology::place_template(&parent, Direction::Up, &child),
            Cell::new(12, 15)
        );
        assert_eq!(
            DungeonTopology::place_template(&parent, Direction::Down, &child),
            Cell::new(12, 29)
        );
    }

    #[test]
    fn touching_rooms_intersect() {
        let room = |i: i32, j: i32| {
            Room::new(
                0,
                Cell::new(i, j),
                0,
                BoardType::Rest,
                BoardTemplate::generate_empty(3, 3),
                None,
                None,
            )
        };
        assert!(room(0, 0).intersects(&room(2, 2)));
        assert!(room(0, 0).intersects(&room(3, 0)));
        assert!(!room(0, 0).intersects(&room(4, 0)));
        assert!(!room(0, 0).intersects(&room(0, -4)));
    }

    #[test]
    fn extend_is_idempotent() {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(3);
        let mut dungeon: DungeonTopology = single_cell_dungeon();
        dungeon.extend(0, &mut rng).unwrap();
        let rooms: usize = dungeon.rooms().len();
        assert!(dungeon.room(0).unwrap().extended);
        assert_eq!(dungeon.room(0).unwrap().exits.len(), rooms - 1);

        dungeon.extend(0, &mut rng).unwrap();
        assert_eq!(dungeon.rooms().len(), rooms);
    }

    #[test]
    fn misaligned_doors_are_reported() {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(3);
        let mut dungeon: DungeonTopology = single_cell_dungeon();
        dungeon.extend(0, &mut rng).unwrap();
        assert!(dungeon.rooms().len() > 1);
        assert!(dungeon.asymmetric_exits().is_empty());

        dungeon.rooms[1].pos.i += 1;
        let broken: Vec<(RoomId, Direction)> = dungeon.asymmetric_exits();
        assert_eq!(broken.len(), 2);
        assert!(broken.iter().any(|(id, _)| *id == 0));
        assert!(broken.iter().any(|(id, _)| *id == 1));
    }

    #[test]
    fn children_lead_back_to_their_parent() {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(4);
        let mut dungeon: DungeonTopology = single_cell_dungeon();
        dungeon.extend(0, &mut rng).unwrap();
        for room in &dungeon.rooms()[1..] {
            assert_eq!(room.prev, Some(0));
            assert_ne!(room.board_type, BoardType::Rest);
            assert_eq!(room.level, 1);
            let back: Direction = room.start_dir.unwrap();
            assert_eq!(room.exits.get(&back), Some(&0));
        }
    }

    #[test]
    fn finite_dungeon_invariants() {
        for seed in 0..25 {
            let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(seed);
            let mut dungeon: DungeonTopology = single_cell_dungeon();
            dungeon.generate_finite(8, &mut rng).unwrap();

            assert!(dungeon.overlaps().is_empty(), "seed {seed}");
            assert!(dungeon.asymmetric_exits().is_empty(), "seed {seed}");
            assert!(dungeon.unmatched_keys().is_empty(), "seed {seed}");
            assert!(dungeon.neutral_key_rooms() <= 1, "seed {seed}");
            assert!(dungeon.unused_keys().is_empty());

            for (k, room) in dungeon.rooms().iter().enumerate() {
                assert_eq!(room.id, k);
                assert!(room.extended || room.prev.is_none());
                assert_eq!(room.dim, (room.template.width(), room.template.height()));
                for (direction, target) in &room.exits {
                    let other: &Room = dungeon.room(*target).unwrap();
                    assert!(room.door(*direction).is_adjacent(other.door(direction.opposite())));
                }
            }
        }
    }

    #[test]
    fn random_dungeon() {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(12);
        let mut dungeon: DungeonTopology =
            DungeonTopology::random(5, NarrativeTemplates::default(), &mut rng).unwrap();
        assert_ne!(dungeon.room(0).unwrap().board_type, BoardType::GoishiHiroi);
        dungeon.generate_finite(6, &mut rng).unwrap();
        assert!(dungeon.overlaps().is_empty());
        assert!(dungeon.asymmetric_exits().is_empty());
        assert!(dungeon.rooms().iter().all(|r| r.level >= 5));
        assert!(!dungeon.to_string().is_empty());
    }

    #[test]
    fn keys_are_paired() {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(2);
        let mut dungeon: DungeonTopology = single_cell_dungeon();
        dungeon.generate_finite(10, &mut rng).unwrap();

        let keys: usize = dungeon
            .rooms()
            .iter()
            .filter(|r| r.template.opts.key_provided.is_some())
            .count();
        let locks: usize = dungeon
            .rooms()
            .iter()
            .filter(|r| r.template.opts.lock_required.is_some())
            .count();
        let key_rooms: usize = dungeon
            .rooms()
            .iter()
            .filter(|r| r.board_type == BoardType::KeyOrLock)
            .count();
        assert_eq!(keys, locks);
        assert_eq!(keys * 2 + dungeon.neutral_key_rooms(), key_rooms);
    }

    #[test]
    fn lock_uses_an_unused_key() {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(0);
        let mut dungeon: DungeonTopology = single_cell_dungeon();
        dungeon.unused_keys.insert(String::from("Gruk"));
        let mut locks: usize = 0;
        for _ in 0..300 {
            let generated: GeneratedTemplate =
                dungeon.generate_template(1, None, &mut rng).unwrap();
            if let Some(name) = &generated.template.opts.lock_required {
                assert_eq!(name, "Gruk");
                locks += 1;
            }
        }
        // Not placed, so the key is still unused
        assert!(locks > 0);
        assert!(dungeon.unused_keys().contains("Gruk"));
    }

    #[test]
    fn zero_extensions_keep_the_seed() {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(0);
        let mut dungeon: DungeonTopology = single_cell_dungeon();
        dungeon.generate_finite(0, &mut rng).unwrap();
        assert_eq!(dungeon.rooms().len(), 1);
        assert!(dungeon.room(0).unwrap().exits.is_empty());
    }
}
