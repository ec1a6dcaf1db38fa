/*
names.rs

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

//! Fantasy names for knights and keys.
//!
//! Names are built from syllables. Each [`NameStyle`] has its own sounds, so that all the
//! knights of a graph sound like they come from the same people.

use rand::Rng;
use std::collections::HashSet;
use strum_macros::{Display, FromRepr};

/// Number of random draws before a roman numeral is appended to a name already in use.
const MAX_ATTEMPTS: usize = 16;

/// Phonetic style of the names.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, FromRepr)]
#[repr(usize)]
pub enum NameStyle {
    Dwarf,
    Elf,
    Orc,
    Human,
    Fairy,
    Dragon,
}

/// Sounds used by a style.
struct Sounds {
    onsets: &'static [&'static str],
    vowels: &'static [&'static str],
    codas: &'static [&'static str],
    syllables: (usize, usize),
}

impl NameStyle {
    /// Number of styles.
    pub const COUNT: usize = 6;

    /// Pick a random style.
    pub fn random(rng: &mut impl Rng) -> Self {
        NameStyle::from_repr(rng.random_range(0..Self::COUNT)).unwrap_or(NameStyle::Human)
    }

    fn sounds(&self) -> Sounds {
        match self {
            NameStyle::Dwarf => Sounds {
                onsets: &["k", "kr", "d", "dr", "g", "gr", "th", "b", "br", "t", "st"],
                vowels: &["a", "o", "u", "i", "ur", "or"],
                codas: &["k", "rk", "th", "n", "m", "r", "rd", "lk", "ld"],
                syllables: (1, 3),
            },
            NameStyle::Elf => Sounds {
                onsets: &["l", "th", "s", "n", "r", "f", "v", "gl", "m", "c"],
                vowels: &["ae", "a", "e", "i", "ei", "ia", "io"],
                codas: &["n", "l", "r", "s", "th", "nd", "ll", "wen"],
                syllables: (2, 3),
            },
            NameStyle::Orc => Sounds {
                onsets: &["g", "gr", "z", "b", "br", "k", "kr", "sh", "v", "m"],
                vowels: &["a", "u", "o", "ai"],
                codas: &["g", "k", "sh", "z", "zag", "rk", "kk", "gh"],
                syllables: (1, 2),
            },
            NameStyle::Human => Sounds {
                onsets: &["al", "b", "c", "d", "ed", "g", "h", "j", "m", "r", "w", "th"],
                vowels: &["a", "e", "i", "o", "ea", "y"],
                codas: &["n", "d", "ric", "ld", "m", "s", "rt", "ck"],
                syllables: (2, 2),
            },
            NameStyle::Fairy => Sounds {
                onsets: &["l", "f", "p", "s", "wh", "t", "y", "n"],
                vowels: &["i", "y", "ee", "ia", "a", "e"],
                codas: &["l", "ll", "s", "n", "ss", "th"],
                syllables: (2, 3),
            },
            NameStyle::Dragon => Sounds {
                onsets: &["v", "x", "z", "ss", "dr", "k", "th", "r"],
                vowels: &["a", "ae", "y", "o", "i"],
                codas: &["x", "th", "r", "s", "ss", "n", "gon"],
                syllables: (2, 3),
            },
        }
    }

    /// Generate a name, such as "Krath" or "Aelindra".
    pub fn name(&self, rng: &mut impl Rng) -> String {
        let sounds: Sounds = self.sounds();
        let syllables: usize = rng.random_range(sounds.syllables.0..=sounds.syllables.1);
        let mut name: String = String::new();

        for i in 0..syllables {
            // Vowel-leading names skip the first onset
            if i > 0 || !rng.random_bool(0.2) {
                name.push_str(sounds.onsets[rng.random_range(0..sounds.onsets.len())]);
            }
            name.push_str(sounds.vowels[rng.random_range(0..sounds.vowels.len())]);
            let coda_chance: f64 = if i == syllables - 1 { 0.7 } else { 0.3 };
            if rng.random_bool(coda_chance) {
                name.push_str(sounds.codas[rng.random_range(0..sounds.codas.len())]);
            }
        }
        if name.len() < 2 {
            name.push_str(sounds.codas[rng.random_range(0..sounds.codas.len())]);
        }
        capitalize(&name)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Roman numeral for small numbers, used to tell apart knights with the same name.
fn roman(mut n: usize) -> String {
    const TABLE: [(usize, &str); 9] = [
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut s: String = String::new();
    for (value, numeral) in TABLE {
        while n >= value {
            s.push_str(numeral);
            n -= value;
        }
    }
    s
}

/// Generate names that are unique among the names it already produced.
#[derive(Debug, Clone)]
pub struct UniqueNames {
    style: Option<NameStyle>,
    used: HashSet<String>,
}

impl UniqueNames {
    /// Create a [`UniqueNames`] object. If `style` is `None`, every name gets a random style.
    pub fn new(style: Option<NameStyle>) -> Self {
        Self {
            style,
            used: HashSet::new(),
        }
    }

    /// Return a new name.
    pub fn generate(&mut self, rng: &mut impl Rng) -> String {
        let mut name: String = String::new();
        for _ in 0..MAX_ATTEMPTS {
            let style: NameStyle = match self.style {
                Some(s) => s,
                None => NameStyle::random(rng),
            };
            name = style.name(rng);
            if !self.used.contains(&name) {
                self.used.insert(name.clone());
                return name;
            }
        }

        let mut n: usize = 2;
        loop {
            let candidate: String = format!("{name} {}", roman(n));
            if !self.used.contains(&candidate) {
                self.used.insert(candidate.clone());
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn names_are_capitalized() {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(4);
        for i in 0..NameStyle::COUNT {
            let style: NameStyle = NameStyle::from_repr(i).unwrap();
            for _ in 0..20 {
                let name: String = style.name(&mut rng);
                assert!(name.len() >= 2, "{style}: {name}");
                assert!(name.chars().next().unwrap().is_uppercase());
            }
        }
    }

    #[test]
    fn unique_names() {
        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(9);
        // Orc names have few syllables, so collisions are frequent
        let mut names: UniqueNames = UniqueNames::new(Some(NameStyle::Orc));
        let mut seen: HashSet<String> = HashSet::new();
        for _ in 0..500 {
            let name: String = names.generate(&mut rng);
            assert!(seen.insert(name));
        }
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(roman(2), "II");
        assert_eq!(roman(4), "IV");
        assert_eq!(roman(14), "XIV");
        assert_eq!(roman(99), "XCIX");
    }
}
