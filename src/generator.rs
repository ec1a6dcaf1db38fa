/*
generator.rs

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

//! Generate the puzzles and the dungeon that holds them.
//!
//! Each puzzle type has its own generator:
//!
//! * [`path_walker::PathWalker`] builds a maze around a closed path.
//!   The junctions of the maze are the torches that the player must light.
//! * [`stone_walker::StoneWalker`] builds a Goishi-Hiroi walk: a line of stones that the player
//!   must pick up in order, moving straight and never turning back.
//! * [`partition::PartitionGenerator`] splits beads into piles that the player must share
//!   evenly between altars.
//! * [`knight_graph::KnightGraph`] builds a three-colorable graph of knights and their duels.
//!   The player deduces the color of each knight from their declarations.
//!
//! The generators do not fail when they run out of choices: they stop and return a shorter
//! result, which is still consistent.
//!
//! [`board::BoardTemplate`] converts the outputs into the terrain and entities that the game
//! draws, and [`dungeon::DungeonTopology`] places the resulting rooms next to each other.
//!
//! Every generator draws its random numbers from the [`rand::Rng`] object that the caller
//! provides, so that a seeded generator always produces the same puzzles.

pub mod board;
pub mod cell;
pub mod dungeon;
pub mod edges;
pub mod error;
pub mod knight_graph;
pub mod names;
pub mod partition;
pub mod path;
pub mod path_walker;
pub mod stone_walker;
