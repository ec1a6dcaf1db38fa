/*
cli_options.rs

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

//! Process command-line options.
//!
//! By default, temple-gen generates a dungeon and draws its map.
//! The `--board` option generates a single room instead, which is useful when tuning a puzzle
//! generator.
//!
//! # Examples
//!
//! Generate a dungeon from a known seed and print it in JSON format:
//!
//! ```
//! $ temple-gen --seed 42 --rooms 20 --json
//! ```
//!
//! Generate a 6x4 maze and print some statistics:
//!
//! ```
//! $ temple-gen --board hamiltonian --width 6 --height 4 --summary
//! ~~~~~~~~~~~~~~~
//! ...
//!     junctions = 5
//!          seed = 9817238712
//! ```

use clap::{Parser, ValueEnum};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::config::{self, COPYRIGHT_NOTICE};
use crate::generator::board::{BoardTemplate, MobKind, Terrain};
use crate::generator::dungeon::{self, BoardType, DungeonTopology};
use crate::generator::error::GeneratorError;
use crate::generator::knight_graph::{Declarations, KnightGraph};
use crate::generator::partition::{BeadPiles, PartitionGenerator};
use crate::generator::path_walker::{PathBoard, PathWalker};
use crate::generator::stone_walker::{StoneBoard, StoneWalker};
use crate::settings::{Settings, SettingsFile};

/// Rooms that can be generated alone.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum Board {
    Hamiltonian,
    GoishiHiroi,
    Altar,
    Knights,
    Rest,
    Empty,
}

/// Generate puzzle dungeons.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Number of room extensions for the dungeon
    #[arg(short, long, conflicts_with = "board")]
    rooms: Option<usize>,

    /// Generate a single room of the given type instead of a dungeon
    #[arg(value_enum, short, long)]
    board: Option<Board>,

    /// Level of the seed room, or of the single room
    #[arg(short, long)]
    level: Option<usize>,

    /// Width of the single room
    #[arg(long, requires = "board")]
    width: Option<usize>,

    /// Height of the single room
    #[arg(long, requires = "board")]
    height: Option<usize>,

    /// Maximum number of moves for the Goishi-Hiroi walk
    #[arg(long, requires = "board")]
    steps: Option<usize>,

    /// Number of altars
    #[arg(long, requires = "board")]
    buckets: Option<usize>,

    /// Number of knight graph expansions
    #[arg(long, requires = "board")]
    iterations: Option<usize>,

    /// Seed for the random generator
    #[arg(long)]
    seed: Option<u64>,

    /// Settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result in JSON format
    #[arg(short, long, default_value_t = false)]
    json: bool,

    /// Print some statistics after generating
    #[arg(short, long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Parse and process command-line options. Return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    //
    // Settings from the file, then from the command line
    //
    let settings_file: SettingsFile = SettingsFile::new(
        args.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(config::SETTINGS_FILE)),
    );
    let mut settings: Settings = match settings_file.get_settings() {
        Ok(Some(s)) => s,
        Ok(None) => {
            if let Some(path) = &args.config {
                eprintln!("Settings file {path:?} not found");
                return 1;
            }
            Settings::default()
        }
        Err(e) => {
            eprintln!("Cannot read the settings file: {e}");
            return 1;
        }
    };
    if let Some(rooms) = args.rooms {
        settings.rooms = rooms;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    debug!("Settings: {settings:?}");

    let seed: u64 = settings.seed.unwrap_or_else(|| rand::rng().random());
    info!("Seed: {seed}");
    let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(seed);

    let ret: Result<u8, GeneratorError> = match args.board {
        Some(board) => single_board(&args, board, &settings, &mut rng).map(|template| {
            let code: u8 = output(&template, args.json);
            if args.summary {
                board_summary(&template, seed);
            }
            code
        }),
        None => build_dungeon(&settings, &mut rng).map(|dungeon| {
            let mut code: u8 = output(&dungeon, args.json);
            if !verify(&dungeon) {
                code = 1;
            }
            if args.summary {
                dungeon_summary(&dungeon, seed);
            }
            code
        }),
    };

    match ret {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

/// Print the object in JSON format or as text.
fn output<T: Serialize + fmt::Display>(value: &T, json: bool) -> u8 {
    if !json {
        print!("{value}");
        return 0;
    }
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{s}");
            0
        }
        Err(e) => {
            eprintln!("Cannot serialize the result: {e}");
            1
        }
    }
}

/// Generate a single room.
fn single_board(
    args: &Args,
    board: Board,
    settings: &Settings,
    rng: &mut ChaCha8Rng,
) -> Result<BoardTemplate, GeneratorError> {
    let level: usize = settings.level;

    let template: BoardTemplate = match board {
        Board::Hamiltonian => {
            let side: usize = dungeon::hamiltonian_side(level);
            let mut walker: PathWalker =
                PathWalker::new(args.width.unwrap_or(side), args.height.unwrap_or(side))?;
            let maze: PathBoard = walker.generate(rng);
            debug!("Maze built in {} iterations", walker.iteration);
            BoardTemplate::from_path_board(&maze)
        }
        Board::GoishiHiroi => {
            let side: usize = dungeon::goishi_hiroi_side(level);
            let walk: StoneBoard = StoneWalker::new(
                args.width.unwrap_or(side),
                args.height.unwrap_or(side),
                args.steps.unwrap_or(dungeon::goishi_hiroi_steps(level)),
            )?
            .generate(rng);
            BoardTemplate::from_stone_board(&walk)
        }
        Board::Altar => {
            let beads: BeadPiles = PartitionGenerator::new(
                args.buckets.unwrap_or(dungeon::altar_buckets(level)),
            )?
            .generate(rng);
            BoardTemplate::from_partition(&beads, rng)
        }
        Board::Knights => {
            let iterations: usize = args
                .iterations
                .unwrap_or(dungeon::knight_expansions(level));
            let graph: KnightGraph = KnightGraph::build(iterations, rng);
            BoardTemplate::from_knight_graph(&graph, &settings.narrative, rng)?
        }
        Board::Rest => BoardTemplate::generate_rest(
            args.width
                .unwrap_or_else(|| rng.random_range(1..=config::REST_MAX_WIDTH)),
            args.height
                .unwrap_or_else(|| rng.random_range(1..=config::REST_MAX_HEIGHT)),
        ),
        Board::Empty => {
            BoardTemplate::generate_empty(args.width.unwrap_or(7), args.height.unwrap_or(7))
        }
    };

    // The knight declarations are not part of the drawing
    if board == Board::Knights && !args.json {
        let declarations: Declarations = template
            .mobs
            .iter()
            .filter_map(|m| match &m.kind {
                MobKind::Knight {
                    name, declarations, ..
                } => Some((name.clone(), declarations.clone())),
                _ => None,
            })
            .collect();
        println!("{}\n", KnightGraph::clue_text(&declarations));
    }
    Ok(template)
}

/// Generate a dungeon.
fn build_dungeon(
    settings: &Settings,
    rng: &mut ChaCha8Rng,
) -> Result<DungeonTopology, GeneratorError> {
    let mut dungeon: DungeonTopology =
        DungeonTopology::random(settings.level, settings.narrative.clone(), rng)?;
    dungeon.generate_finite(settings.rooms, rng)?;
    Ok(dungeon)
}

/// Verify the dungeon invariants. Return false if one is broken.
fn verify(dungeon: &DungeonTopology) -> bool {
    let mut ok: bool = true;

    for (a, b) in dungeon.overlaps() {
        eprintln!("Bug: rooms {a} and {b} overlap");
        ok = false;
    }
    for (room, direction) in dungeon.asymmetric_exits() {
        eprintln!(
            "Bug: the {direction} exit of room {room} does not lead back to a facing door"
        );
        ok = false;
    }
    for name in dungeon.unmatched_keys() {
        eprintln!("Bug: the {name} key does not match exactly one lock");
        ok = false;
    }
    if dungeon.neutral_key_rooms() > 1 {
        eprintln!(
            "Bug: {} key rooms have no partner",
            dungeon.neutral_key_rooms()
        );
        ok = false;
    }
    ok
}

fn board_summary(template: &BoardTemplate, seed: u64) {
    let knights: usize = template
        .mobs
        .iter()
        .filter(|m| matches!(m.kind, MobKind::Knight { .. }))
        .count();
    println!(
        "
          size = {}x{}
     junctions = {}
         runes = {}
        altars = {}
       knights = {}
          seed = {}",
        template.width(),
        template.height(),
        template.count(Terrain::UnlitTorch),
        template.count(Terrain::UnusedIceRune),
        template
            .mobs
            .iter()
            .filter(|m| m.kind == MobKind::Altar)
            .count(),
        knights,
        seed
    );
}

fn dungeon_summary(dungeon: &DungeonTopology, seed: u64) {
    let mut per_type: BTreeMap<BoardType, usize> = BTreeMap::new();
    for room in dungeon.rooms() {
        *per_type.entry(room.board_type).or_default() += 1;
    }
    let max_level: usize = dungeon.rooms().iter().map(|r| r.level).max().unwrap_or(0);

    println!();
    println!("         rooms = {}", dungeon.rooms().len());
    for (board_type, count) in per_type {
        println!("{:>14} = {count}", board_type.to_string());
    }
    println!("     max level = {max_level}");
    if let Some(room) = dungeon.room(0) {
        println!("     seed room = {}", room.board_type);
    }
    println!(" neutral rooms = {}", dungeon.neutral_key_rooms());
    println!("   unused keys = {}", dungeon.unused_keys().len());
    println!("          seed = {seed}");
}
