/*
knight_graph.rs

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

//! Knights and their enemies.
//!
//! Every knight serves one of three colors and only fights knights of the other colors.
//! The graph starts with the three kings, enemies of each other, and grows by expanding random
//! knights: an expanded knight is replaced by a small group of knights that keeps the graph
//! three-colorable.
//!
//! [`KnightGraph::render`] turns the enemy relationships into the dated duel declarations that
//! the player reads to deduce the colors.

use formatx::formatx;
use log::{Level, debug, log_enabled};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use strum_macros::{Display, FromRepr};

use super::error::GeneratorError;
use super::names::{NameStyle, UniqueNames};

/// Seasons, indexed by the date modulo 4.
const SEASONS: [&str; 4] = ["spring", "fall", "winter", "summer"];

/// Latest possible base date (in seasons).
const MAX_BASE_DATE: usize = 4000;

/// Maximum number of seasons between the first and the last duel.
const MAX_DATE_SPREAD: usize = 80;

/// Knight colors.
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
pub enum KnightColor {
    Red,
    Green,
    Blue,
}

impl KnightColor {
    /// The two other colors.
    pub fn others(&self) -> [KnightColor; 2] {
        match self {
            KnightColor::Red => [KnightColor::Green, KnightColor::Blue],
            KnightColor::Green => [KnightColor::Red, KnightColor::Blue],
            KnightColor::Blue => [KnightColor::Red, KnightColor::Green],
        }
    }
}

/// Stable knight identifier. Names are only used for display.
pub type KnightId = usize;

/// Knight object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Knight {
    pub id: KnightId,
    pub color: KnightColor,
    pub name: String,
    pub enemies: BTreeSet<KnightId>,
}

/// Sentence templates for the duel declarations.
///
/// The templates accept the `{season}`, `{year}`, and `{name}` placeholders.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NarrativeTemplates {
    /// The knight won a duel against a knight that fights again later.
    pub bested: String,

    /// The knight won the last duel of the other knight.
    pub felled: String,

    /// The knight lost their last duel.
    pub felled_by: String,
}

impl Default for NarrativeTemplates {
    fn default() -> Self {
        Self {
            bested: String::from("In the {season} of {year}, I bested {name}"),
            felled: String::from("In the {season} of {year}, I felled {name}"),
            felled_by: String::from("In the {season} of {year}, I was felled by {name}"),
        }
    }
}

impl NarrativeTemplates {
    fn fill(template: &str, date: usize, name: &str) -> Result<String, GeneratorError> {
        formatx!(
            template,
            season = SEASONS[date % 4],
            year = date / 4,
            name = name
        )
        .map_err(|e| GeneratorError::Template(format!("{e:?}")))
    }
}

/// Declarations of every knight, indexed by knight name in alphabetical order.
pub type Declarations = BTreeMap<String, Vec<String>>;

/// Enemy graph.
#[derive(Serialize, Debug, Clone)]
pub struct KnightGraph {
    knights: BTreeMap<KnightId, Knight>,

    #[serde(skip)]
    next_id: KnightId,

    #[serde(skip)]
    names: UniqueNames,
}

impl KnightGraph {
    /// Create the graph with the three kings.
    pub fn new(rng: &mut impl Rng) -> Self {
        let style: NameStyle = NameStyle::random(rng);
        debug!("Knight names in the {style} style");

        let mut graph: KnightGraph = Self {
            knights: BTreeMap::new(),
            next_id: 0,
            names: UniqueNames::new(Some(style)),
        };
        let red_king: KnightId = graph.add_knight(KnightColor::Red, rng);
        let blue_king: KnightId = graph.add_knight(KnightColor::Blue, rng);
        let green_king: KnightId = graph.add_knight(KnightColor::Green, rng);
        graph.make_enemies(red_king, blue_king);
        graph.make_enemies(red_king, green_king);
        graph.make_enemies(blue_king, green_king);
        graph
    }

    /// Create the graph and expand it `iterations` times.
    pub fn build(iterations: usize, rng: &mut impl Rng) -> Self {
        let mut graph: KnightGraph = Self::new(rng);
        for _ in 0..iterations {
            graph.iterate(rng);
        }
        debug!(
            "Knight graph: {} knights after {iterations} expansions",
            graph.len()
        );
        graph
    }

    /// Create a knight with no enemy.
    fn add_knight(&mut self, color: KnightColor, rng: &mut impl Rng) -> KnightId {
        let id: KnightId = self.next_id;
        self.next_id += 1;
        let name: String = self.names.generate(rng);
        self.knights.insert(
            id,
            Knight {
                id,
                color,
                name,
                enemies: BTreeSet::new(),
            },
        );
        id
    }

    /// Make the two knights enemies.
    fn make_enemies(&mut self, a: KnightId, b: KnightId) {
        if a == b {
            return;
        }
        if let Some(k) = self.knights.get_mut(&a) {
            k.enemies.insert(b);
        }
        if let Some(k) = self.knights.get_mut(&b) {
            k.enemies.insert(a);
        }
    }

    /// Remove the knight and its enemy relationships.
    pub fn remove_knight(&mut self, id: KnightId) {
        if let Some(knight) = self.knights.remove(&id) {
            for enemy in knight.enemies {
                if let Some(k) = self.knights.get_mut(&enemy) {
                    k.enemies.remove(&id);
                }
            }
        }
    }

    /// Expand a random knight.
    pub fn iterate(&mut self, rng: &mut impl Rng) {
        if self.knights.is_empty() {
            return;
        }
        let index: usize = rng.random_range(0..self.knights.len());
        if let Some(id) = self.knights.keys().nth(index).copied() {
            self.expand(id, rng);
        }
    }

    /// Replace the knight by an anchor, a core, and one fringe knight per enemy.
    ///
    /// The anchor and the core take the two other colors. Each fringe knight has the color of
    /// the expanded knight and fights one of its former enemies, the anchor, and the core.
    /// The anchor also fights a knight of the core color that already exists.
    pub fn expand(&mut self, id: KnightId, rng: &mut impl Rng) {
        let (color, enemies) = match self.knights.get(&id) {
            Some(k) => (k.color, k.enemies.clone()),
            None => return,
        };

        let others: [KnightColor; 2] = color.others();
        let a: usize = rng.random_range(0..2);
        let anchor_color: KnightColor = others[a];
        let core_color: KnightColor = others[1 - a];

        let anchor: KnightId = self.add_knight(anchor_color, rng);
        let core: KnightId = self.add_knight(core_color, rng);
        self.make_enemies(anchor, core);

        let anchor_locations: Vec<KnightId> = self
            .knights
            .values()
            .filter(|k| k.color == core_color && k.id != core)
            .map(|k| k.id)
            .collect();
        if anchor_locations.is_empty() {
            debug!("No {core_color} knight to attach the anchor to");
        } else {
            let location: KnightId = anchor_locations[rng.random_range(0..anchor_locations.len())];
            self.make_enemies(anchor, location);
        }

        for enemy in enemies {
            let fringe: KnightId = self.add_knight(color, rng);
            self.make_enemies(fringe, enemy);
            self.make_enemies(anchor, fringe);
            self.make_enemies(core, fringe);
        }

        self.remove_knight(id);
    }

    /// Number of knights.
    pub fn len(&self) -> usize {
        self.knights.len()
    }

    /// Return the knight.
    pub fn get(&self, id: KnightId) -> Option<&Knight> {
        self.knights.get(&id)
    }

    /// Iterate over the knights, by identifier.
    pub fn knights(&self) -> impl Iterator<Item = &Knight> {
        self.knights.values()
    }

    /// Return the knight with the given name.
    pub fn by_name(&self, name: &str) -> Option<&Knight> {
        self.knights().find(|k| k.name == name)
    }

    /// Names of the enemies of the knight.
    pub fn enemy_names(&self, id: KnightId) -> Vec<String> {
        match self.get(id) {
            Some(k) => k
                .enemies
                .iter()
                .filter_map(|e| self.get(*e))
                .map(|e| e.name.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every enemy relationship, once.
    pub fn enemy_pairs(&self) -> Vec<(KnightId, KnightId)> {
        let mut done: HashSet<KnightId> = HashSet::with_capacity(self.knights.len());
        let mut pairs: Vec<(KnightId, KnightId)> = Vec::new();

        for knight in self.knights.values() {
            for enemy in &knight.enemies {
                if !done.contains(enemy) {
                    pairs.push((knight.id, *enemy));
                }
            }
            done.insert(knight.id);
        }
        pairs
    }

    /// Render the duels as declarations.
    ///
    /// Each enemy relationship becomes one duel. The duels are shuffled and dated in that order.
    /// A coin flip decides the winner. When the loser never fights again, the winner "felled"
    /// them and the loser also declares who felled them; otherwise the winner "bested" them.
    ///
    /// # Errors
    ///
    /// Return an error if a template cannot be rendered.
    pub fn render(
        &self,
        templates: &NarrativeTemplates,
        rng: &mut impl Rng,
    ) -> Result<Declarations, GeneratorError> {
        let mut duels: Vec<(KnightId, KnightId)> = self.enemy_pairs();
        duels.shuffle(rng);

        let base_date: usize = rng.random_range(0..MAX_BASE_DATE);
        let mut dates: Vec<usize> = (0..duels.len())
            .map(|_| base_date + rng.random_range(0..MAX_DATE_SPREAD))
            .collect();
        dates.sort_unstable();

        let mut declarations: BTreeMap<KnightId, Vec<String>> = self
            .knights
            .keys()
            .map(|id| (*id, Vec::new()))
            .collect();

        for (i, (a, b)) in duels.iter().enumerate() {
            let (winner, loser) = if rng.random_bool(0.5) {
                (*a, *b)
            } else {
                (*b, *a)
            };
            let is_last: bool = duels[i + 1..]
                .iter()
                .all(|(x, y)| *x != loser && *y != loser);

            let winner_name: &str = self.name(winner);
            let loser_name: &str = self.name(loser);
            let template: &str = if is_last {
                &templates.felled
            } else {
                &templates.bested
            };
            let line: String = NarrativeTemplates::fill(template, dates[i], loser_name)?;
            declarations.entry(winner).or_default().push(line);

            if is_last {
                let line: String =
                    NarrativeTemplates::fill(&templates.felled_by, dates[i], winner_name)?;
                declarations.entry(loser).or_default().push(line);
            }
        }

        let rendering: Declarations = declarations
            .into_iter()
            .map(|(id, lines)| (self.name(id).to_string(), lines))
            .collect();

        if log_enabled!(Level::Debug) {
            debug!("{}", Self::clue_text(&rendering));
        }
        Ok(rendering)
    }

    /// Format the declarations as a clue book.
    pub fn clue_text(declarations: &Declarations) -> String {
        declarations
            .iter()
            .map(|(name, lines)| {
                let mut s: String = format!("I am {name}.");
                for l in lines {
                    s.push('\n');
                    s.push_str(l);
                }
                s
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn name(&self, id: KnightId) -> &str {
        match self.get(id) {
            Some(k) => &k.name,
            None => "",
        }
    }
}
