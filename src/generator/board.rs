/*
board.rs

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

//! Translate the generator outputs into room payloads.
//!
//! A [`BoardTemplate`] is what the game engine draws and plays: a terrain grid, the entities
//! standing on it, and a few options that tell the engine how the puzzle is solved.
//! The room dimensions in the dungeon come from these templates.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::cell::Cell;
use super::error::GeneratorError;
use super::knight_graph::{Declarations, KnightColor, KnightGraph, NarrativeTemplates};
use super::partition::BeadPiles;
use super::path_walker::PathBoard;
use super::stone_walker::StoneBoard;

/// Terrain categories.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Terrain {
    Water,
    Path,
    LitTorch,
    UnlitTorch,
    SourceTorch,
    Ice,
    UnusedIceRune,
    UsedIceRune,
    Purple,
    Grass,
}

impl Terrain {
    fn symbol(&self) -> char {
        match self {
            Terrain::Water => '~',
            Terrain::Path => '.',
            Terrain::LitTorch => '*',
            Terrain::UnlitTorch => 'o',
            Terrain::SourceTorch => '@',
            Terrain::Ice => '_',
            Terrain::UnusedIceRune => 'x',
            Terrain::UsedIceRune => '+',
            Terrain::Purple => 'p',
            Terrain::Grass => '"',
        }
    }
}

/// Kinds of entities.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MobKind {
    /// Grants the key of the room.
    Chest,

    /// Requires the key of the room.
    Locker,

    /// Pile of beads.
    Pile { size: usize },

    /// Receives the beads.
    Altar,

    Knight {
        name: String,
        color: KnightColor,
        declarations: Vec<String>,
        enemies: Vec<String>,
        reveal_color: bool,
    },
}

/// Entity standing on the terrain.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Mob {
    pub pos: Cell,
    #[serde(flatten)]
    pub kind: MobKind,
}

impl Mob {
    fn new(i: usize, j: usize, kind: MobKind) -> Self {
        Self {
            pos: Cell::new(i as i32, j as i32),
            kind,
        }
    }

    fn symbol(&self) -> char {
        match self.kind {
            MobKind::Chest => 'C',
            MobKind::Locker => 'L',
            MobKind::Pile { size } if size < 10 => char::from_digit(size as u32, 10).unwrap_or('P'),
            MobKind::Pile { .. } => 'P',
            MobKind::Altar => 'A',
            MobKind::Knight { .. } => 'K',
        }
    }
}

/// Options that tell the engine how the room is solved.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LevelOptions {
    /// Torch from which the junction lighting starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h_root: Option<Cell>,

    /// Number of beads each altar needs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altar_target: Option<usize>,

    pub goishi_hiroi: bool,

    /// Name of the key the room grants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_provided: Option<String>,

    /// Name of the key the room requires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_required: Option<String>,

    /// The room is solved as soon as the player enters.
    pub auto_finish: bool,
}

/// Room payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BoardTemplate {
    /// Terrain, indexed by column then row.
    pub terrain: Vec<Vec<Terrain>>,

    pub mobs: Vec<Mob>,

    pub opts: LevelOptions,
}

impl BoardTemplate {
    /// Create a `width` x `height` template filled with `terrain`.
    fn filled(width: usize, height: usize, terrain: Terrain) -> Self {
        Self {
            terrain: vec![vec![terrain; height]; width],
            mobs: Vec::new(),
            opts: LevelOptions::default(),
        }
    }

    /// Set the terrain of a cell. Cells out of the board are ignored.
    fn set(&mut self, i: usize, j: usize, terrain: Terrain) {
        if let Some(t) = self.terrain.get_mut(i).and_then(|column| column.get_mut(j)) {
            *t = terrain;
        }
    }

    /// Draw a path ring along the border.
    fn ring(&mut self) {
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 {
            return;
        }
        for i in 0..width {
            self.set(i, 0, Terrain::Path);
            self.set(i, height - 1, Terrain::Path);
        }
        for j in 0..height {
            self.set(0, j, Terrain::Path);
            self.set(width - 1, j, Terrain::Path);
        }
    }

    /// Return the terrain of a cell.
    pub fn get(&self, i: usize, j: usize) -> Option<Terrain> {
        self.terrain.get(i).and_then(|column| column.get(j)).copied()
    }

    pub fn width(&self) -> usize {
        self.terrain.len()
    }

    pub fn height(&self) -> usize {
        self.terrain.first().map_or(0, |column| column.len())
    }

    /// Number of cells with the given terrain.
    pub fn count(&self, terrain: Terrain) -> usize {
        self.terrain
            .iter()
            .flatten()
            .filter(|t| **t == terrain)
            .count()
    }

    /// Maze room: the junctions are torches to light, starting from the root torch.
    pub fn from_path_board(board: &PathBoard) -> Self {
        let (w, h) = (board.width, board.height);
        let mut template: BoardTemplate = Self::filled(w * 2 + 3, h * 2 + 3, Terrain::Water);

        for i in 0..w {
            for j in 0..h {
                template.set(i * 2 + 2, j * 2 + 2, Terrain::Path);
            }
        }
        for junction in board.junctions() {
            template.set(
                junction.i as usize * 2 + 2,
                junction.j as usize * 2 + 2,
                Terrain::UnlitTorch,
            );
        }
        for edge in board.edges.iter() {
            let (a, b) = edge.cells();
            template.set(
                (a.i + b.i) as usize + 2,
                (a.j + b.j) as usize + 2,
                Terrain::Path,
            );
        }

        template.ring();
        template.set(w + 1, 1, Terrain::Path);
        template.set(w + 1, h * 2 + 1, Terrain::Path);

        let root: Cell = Cell::new((w / 2 * 2 + 2) as i32, (h * 2) as i32);
        template.set(root.i as usize, root.j as usize, Terrain::SourceTorch);
        template.opts.h_root = Some(root);
        template
    }

    /// Ice room: the stones of the walk are runes on the ice.
    pub fn from_stone_board(board: &StoneBoard) -> Self {
        let (w, h) = (board.width, board.height);
        let mut template: BoardTemplate = Self::generate_empty(w + 6, h + 6);

        for i in 0..w {
            for j in 0..h {
                template.set(i + 3, j + 3, Terrain::Ice);
            }
        }
        for stone in &board.path {
            template.set(
                stone.i as usize + 3,
                stone.j as usize + 3,
                Terrain::UnusedIceRune,
            );
        }

        template.opts = LevelOptions {
            goishi_hiroi: true,
            ..Default::default()
        };
        template
    }

    /// Altar hall: the bead piles, shuffled, must be split between the altars.
    pub fn from_partition(beads: &BeadPiles, rng: &mut impl Rng) -> Self {
        let n: usize = beads.num_buckets;
        let width: usize = n * 4 + 5;
        let mut template: BoardTemplate = Self::filled(width, 12, Terrain::Path);

        for i in 0..n * 4 + 3 {
            template.set(i + 1, 1, Terrain::Water);
            template.set(i + 1, 10, Terrain::Water);
        }
        template.set(width / 2, 1, Terrain::Path);
        template.set(width / 2, 10, Terrain::Path);
        for j in 0..10 {
            template.set(1, j + 1, Terrain::Water);
            template.set(n * 4 + 3, j + 1, Terrain::Water);
        }

        for i in 0..n {
            template.mobs.push(Mob::new(4 + i * 4, 3, MobKind::Altar));
            for k in 0..3 {
                template.set(3 + i * 4 + k, 4, Terrain::Purple);
            }
            template.set(3 + i * 4, 3, Terrain::UnlitTorch);
            template.set(5 + i * 4, 3, Terrain::UnlitTorch);
        }

        let mut piles: Vec<usize> = beads.flatten();
        piles.shuffle(rng);
        for (k, size) in piles.into_iter().enumerate() {
            if size != 0 {
                template.mobs.push(Mob::new(3 + k, 8, MobKind::Pile { size }));
            }
        }

        template.opts.altar_target = Some(beads.target());
        template
    }

    /// Courtyard of knights: the player must find the color of every knight.
    ///
    /// # Errors
    ///
    /// Return an error if the declarations cannot be rendered.
    pub fn from_knight_graph(
        graph: &KnightGraph,
        templates: &NarrativeTemplates,
        rng: &mut impl Rng,
    ) -> Result<Self, GeneratorError> {
        let size: usize = graph.len();
        // One more slot than knights, for the entrance
        let side: usize = ((size + 1) as f64).sqrt().ceil() as usize;
        let slots: usize = side * side;
        let mut template: BoardTemplate = Self::filled(side * 2 + 3, side * 2 + 3, Terrain::Path);

        for k in 0..side * 2 + 1 {
            template.set(k + 1, 1, Terrain::Water);
            template.set(k + 1, side * 2 + 1, Terrain::Water);
            template.set(1, k + 1, Terrain::Water);
            template.set(side * 2 + 1, k + 1, Terrain::Water);
        }
        for i in 0..side.saturating_sub(1) {
            for j in 0..side.saturating_sub(1) {
                template.set(i * 2 + 3, j * 2 + 3, Terrain::LitTorch);
            }
        }
        template.set(side + 1, side * 2 + 1, Terrain::Path);
        for (i, j) in [(1, 1), (1, side * 2 + 1), (side * 2 + 1, 1), (side * 2 + 1, side * 2 + 1)] {
            template.set(i, j, Terrain::LitTorch);
        }

        let declarations: Declarations = graph.render(templates, rng)?;

        let mut taken: BTreeSet<usize> = BTreeSet::new();
        taken.insert(side * side.saturating_sub(1) + side.saturating_sub(1) / 2);
        let mut index: usize = 0;
        while taken.contains(&index) && index + 1 < slots {
            index += 1;
        }

        for (name, lines) in declarations {
            let Some(knight) = graph.by_name(&name) else {
                continue;
            };
            template.mobs.push(Mob::new(
                (index % side) * 2 + 2,
                (index / side) * 2 + 2,
                MobKind::Knight {
                    color: knight.color,
                    enemies: graph.enemy_names(knight.id),
                    name,
                    declarations: lines,
                    reveal_color: false,
                },
            ));
            taken.insert(index);
            if taken.len() >= slots {
                break;
            }

            let skip: usize = rng.random_range(0..slots - taken.len());
            for _ in 0..=skip {
                index = (index + 1) % slots;
                while taken.contains(&index) {
                    index = (index + 1) % slots;
                }
            }
        }

        template.reveal_two(rng);
        Ok(template)
    }

    /// Reveal the color of a random knight and of one of its enemies.
    fn reveal_two(&mut self, rng: &mut impl Rng) {
        if self.mobs.is_empty() {
            return;
        }
        let king: usize = rng.random_range(0..self.mobs.len());
        let queen_name: Option<String> = match &mut self.mobs[king].kind {
            MobKind::Knight {
                enemies,
                reveal_color,
                ..
            } => {
                *reveal_color = true;
                if enemies.is_empty() {
                    None
                } else {
                    Some(enemies[rng.random_range(0..enemies.len())].clone())
                }
            }
            _ => None,
        };

        let Some(queen_name) = queen_name else { return };
        for mob in &mut self.mobs {
            if let MobKind::Knight {
                name, reveal_color, ..
            } = &mut mob.kind
                && *name == queen_name
            {
                *reveal_color = true;
                debug!("Revealed the colors of {queen_name} and of one of its enemies");
            }
        }
    }

    /// Room that grants the named key.
    pub fn generate_key(name: &str) -> Self {
        let mut template: BoardTemplate = Self::generate_empty(7, 7);
        template.mobs.push(Mob::new(3, 3, MobKind::Chest));
        template.opts = LevelOptions {
            key_provided: Some(name.to_string()),
            auto_finish: true,
            ..Default::default()
        };
        template
    }

    /// Room that requires the named key.
    pub fn generate_lock(name: &str) -> Self {
        let mut template: BoardTemplate = Self::generate_empty(7, 7);
        template.mobs.push(Mob::new(3, 3, MobKind::Locker));
        template.opts = LevelOptions {
            lock_required: Some(name.to_string()),
            ..Default::default()
        };
        template
    }

    /// Neutral room: a moat between the border ring and the floor, with four crossings.
    pub fn generate_empty(width: usize, height: usize) -> Self {
        let mut template: BoardTemplate = Self::filled(width, height, Terrain::Water);

        for i in 2..width.saturating_sub(2) {
            for j in 2..height.saturating_sub(2) {
                template.set(i, j, Terrain::Path);
            }
        }
        template.ring();
        template.set(1, height / 2, Terrain::Path);
        if width >= 2 {
            template.set(width - 2, height / 2, Terrain::Path);
        }
        template.set(width / 2, 1, Terrain::Path);
        if height >= 2 {
            template.set(width / 2, height - 2, Terrain::Path);
        }

        template.opts.auto_finish = true;
        template
    }

    /// Garden of `w` x `h` plots. Outer plots of large gardens hold a pair of altars.
    pub fn generate_rest(w: usize, h: usize) -> Self {
        let width: usize = (w * 6 + 2).div_ceil(2) * 2 + 1;
        let height: usize = (h * 7 + 2).div_ceil(2) * 2 + 1;
        let mut template: BoardTemplate = Self::filled(width, height, Terrain::Grass);
        template.ring();

        for i in 0..w {
            for j in 0..h {
                let (x, y) = (i * 6, j * 7);
                for k in 0..5 {
                    for m in 0..4 {
                        template.set(x + 2 + m, y + 2 + k, Terrain::Path);
                    }
                }

                let outer: bool =
                    (w >= 4 && (i == 0 || i == w - 1)) || (h >= 3 && (j == 0 || j == h - 1));
                let centre: Terrain = if outer {
                    template.mobs.push(Mob::new(x + 3, y + 3, MobKind::Altar));
                    template.mobs.push(Mob::new(x + 4, y + 5, MobKind::Altar));
                    Terrain::Purple
                } else {
                    Terrain::Water
                };
                for k in 0..3 {
                    for m in 0..2 {
                        template.set(x + 3 + m, y + 3 + k, centre);
                    }
                }

                for (a, b) in [(2, 2), (5, 2), (2, 6), (5, 6)] {
                    template.set(x + a, y + b, Terrain::LitTorch);
                }
            }
        }

        template.opts.auto_finish = true;
        template
    }
}

impl fmt::Display for BoardTemplate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut rows: Vec<Vec<char>> = (0..self.height())
            .map(|j| {
                (0..self.width())
                    .filter_map(|i| self.get(i, j))
                    .map(|t| t.symbol())
                    .collect()
            })
            .collect();
        for mob in &self.mobs {
            if let Some(c) = rows
                .get_mut(mob.pos.j as usize)
                .and_then(|row| row.get_mut(mob.pos.i as usize))
            {
                *c = mob.symbol();
            }
        }
        for row in rows {
            writeln!(f, "{}", row.into_iter().collect::<String>())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::partition::PartitionGenerator;
    use crate::generator::path_walker::PathWalker;
    use crate::generator::stone_walker::StoneWalker;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn path_board_layout() {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(5);
        let board: PathBoard = PathWalker::new(5, 4).unwrap().generate(&mut rng);
        let template: BoardTemplate = BoardTemplate::from_path_board(&board);

        assert_eq!(template.width(), 13);
        assert_eq!(template.height(), 11);
        assert_eq!(template.opts.h_root, Some(Cell::new(6, 8)));
        assert_eq!(template.get(6, 8), Some(Terrain::SourceTorch));
        assert_eq!(template.count(Terrain::SourceTorch), 1);

        // The root may cover a junction
        let torches: usize = template.count(Terrain::UnlitTorch);
        let junctions: usize = board.junctions().len();
        assert!(torches == junctions || torches + 1 == junctions);

        for edge in board.edges.iter() {
            let (a, b) = edge.cells();
            let (i, j) = ((a.i + b.i + 2) as usize, (a.j + b.j + 2) as usize);
            assert_eq!(template.get(i, j), Some(Terrain::Path));
        }
        assert_eq!(template.get(6, 1), Some(Terrain::Path));
        assert_eq!(template.get(6, 9), Some(Terrain::Path));
        assert_eq!(template.get(0, 0), Some(Terrain::Path));
        assert_eq!(template.get(12, 10), Some(Terrain::Path));
    }

    #[test]
    fn stone_board_layout() {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(6);
        let board: StoneBoard = StoneWalker::new(5, 5, 12).unwrap().generate(&mut rng);
        let template: BoardTemplate = BoardTemplate::from_stone_board(&board);

        assert_eq!((template.width(), template.height()), (11, 11));
        assert_eq!(template.count(Terrain::UnusedIceRune), board.path.len());
        assert_eq!(
            template.count(Terrain::Ice) + board.path.len(),
            25,
            "the ice field covers the whole walk area"
        );
        assert!(template.opts.goishi_hiroi);
        assert!(!template.opts.auto_finish);
    }

    #[test]
    fn altar_hall() {
        for seed in 0..20 {
            let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(seed);
            let n: usize = (seed % 4 + 1) as usize;
            let beads: BeadPiles = PartitionGenerator::new(n).unwrap().generate(&mut rng);
            let template: BoardTemplate = BoardTemplate::from_partition(&beads, &mut rng);

            assert_eq!((template.width(), template.height()), (4 * n + 5, 12));
            assert_eq!(template.opts.altar_target, Some(3 * n));

            let mut altars: usize = 0;
            let mut beads_on_floor: usize = 0;
            for mob in &template.mobs {
                match mob.kind {
                    MobKind::Altar => altars += 1,
                    MobKind::Pile { size } => {
                        assert!(size > 0);
                        assert_eq!(mob.pos.j, 8);
                        beads_on_floor += size;
                    }
                    _ => panic!("unexpected mob {mob:?}"),
                }
            }
            assert_eq!(altars, n);
            assert_eq!(beads_on_floor, 3 * n * n);
            assert_eq!(template.count(Terrain::UnlitTorch), 2 * n);
            assert_eq!(template.count(Terrain::Purple), 3 * n);
        }
    }

    #[test]
    fn knight_courtyard() {
        for seed in 0..20 {
            let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(seed);
            let graph: KnightGraph = KnightGraph::build((seed % 4) as usize, &mut rng);
            let template: BoardTemplate =
                BoardTemplate::from_knight_graph(&graph, &NarrativeTemplates::default(), &mut rng)
                    .unwrap();

            assert_eq!(template.mobs.len(), graph.len());
            let positions: HashSet<Cell> = template.mobs.iter().map(|m| m.pos).collect();
            assert_eq!(positions.len(), graph.len());

            let side: usize = (template.width() - 3) / 2;
            assert!(side * side > graph.len());
            let entrance: Cell = Cell::new(
                ((side - 1) / 2 * 2 + 2) as i32,
                ((side - 1) * 2 + 2) as i32,
            );
            assert!(!positions.contains(&entrance));

            let revealed: Vec<&Mob> = template
                .mobs
                .iter()
                .filter(|m| matches!(m.kind, MobKind::Knight { reveal_color: true, .. }))
                .collect();
            assert_eq!(revealed.len(), 2);
            if let (
                MobKind::Knight { name, enemies, .. },
                MobKind::Knight { name: other, .. },
            ) = (&revealed[0].kind, &revealed[1].kind)
            {
                assert!(enemies.contains(other), "{name} and {other} are not enemies");
            }
        }
    }

    #[test]
    fn key_and_lock_rooms() {
        let key: BoardTemplate = BoardTemplate::generate_key("Gruk");
        assert_eq!((key.width(), key.height()), (7, 7));
        assert_eq!(key.mobs, vec![Mob::new(3, 3, MobKind::Chest)]);
        assert_eq!(key.opts.key_provided.as_deref(), Some("Gruk"));
        assert!(key.opts.auto_finish);

        let lock: BoardTemplate = BoardTemplate::generate_lock("Gruk");
        assert_eq!(lock.mobs, vec![Mob::new(3, 3, MobKind::Locker)]);
        assert_eq!(lock.opts.lock_required.as_deref(), Some("Gruk"));
        assert!(!lock.opts.auto_finish);
    }

    #[test]
    fn tiny_empty_rooms() {
        for w in 0..4 {
            for h in 0..4 {
                let template: BoardTemplate = BoardTemplate::generate_empty(w, h);
                assert_eq!(template.width(), w);
                if w > 0 {
                    assert_eq!(template.height(), h);
                }
            }
        }
        let template: BoardTemplate = BoardTemplate::generate_empty(1, 1);
        assert_eq!(template.to_string(), ".\n");
    }

    #[test]
    fn rest_garden() {
        let template: BoardTemplate = BoardTemplate::generate_rest(4, 2);
        assert_eq!((template.width(), template.height()), (27, 17));
        // Two altars on each plot of the first and last columns
        assert_eq!(template.mobs.len(), 2 * 2 * 2);
        assert_eq!(template.count(Terrain::LitTorch), 4 * 4 * 2);

        let small: BoardTemplate = BoardTemplate::generate_rest(1, 1);
        assert_eq!((small.width(), small.height()), (9, 11));
        assert!(small.mobs.is_empty());
        assert_eq!(small.count(Terrain::Water), 6);
    }

    #[test]
    fn display() {
        let template: BoardTemplate = BoardTemplate::generate_key("Gruk");
        let text: String = template.to_string();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0], ".......");
        assert_eq!(rows[1], ".~~.~~.");
        assert_eq!(rows[3], "...C...");
    }
}
