/*
settings.rs

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

//! Load the user settings.
//!
//! The settings file is a serialization of the [`Settings`] object in JSON format, read with
//! [`serde`]. Missing fields take their default value, so the following file only changes the
//! number of rooms:
//!
//! ```json
//! { "rooms": 30 }
//! ```
//!
//! Command-line options override the values from the file.

use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::PathBuf;

use crate::config;
use crate::generator::knight_graph::NarrativeTemplates;

/// Generation settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Number of room extensions.
    pub rooms: usize,

    /// Level of the seed room. Each room is one level above its parent.
    pub level: usize,

    /// Seed of the random generator. A random seed is used when not set.
    pub seed: Option<u64>,

    /// Sentences for the knight declarations.
    pub narrative: NarrativeTemplates,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rooms: config::DEFAULT_ROOMS,
            level: config::DEFAULT_LEVEL,
            seed: None,
            narrative: NarrativeTemplates::default(),
        }
    }
}

/// Object to read the settings file.
pub struct SettingsFile {
    /// Path to the settings file.
    path: PathBuf,
}

impl SettingsFile {
    /// Create a [`SettingsFile`] object.
    pub fn new(path: PathBuf) -> Self {
        debug!("Settings file: {path:?}");
        Self { path }
    }

    /// Retrieve the [`Settings`] object from the settings file.
    ///
    /// Return the [`Settings`] object or None if the settings file does not exist.
    pub fn get_settings(&self) -> Result<Option<Settings>, Box<dyn Error>> {
        let file: File;
        match File::open(&self.path) {
            Ok(f) => file = f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(Box::new(error)),
            },
        }
        let reader: BufReader<File> = BufReader::new(file);
        let settings: Settings = serde_json::from_reader(reader)?;
        Ok(Some(settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let mut path: PathBuf = env::temp_dir();
        path.push(format!("temple-gen-{}-{name}", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file() {
        let file: SettingsFile = SettingsFile::new(PathBuf::from("/nonexistent/temple-gen.json"));
        assert!(file.get_settings().unwrap().is_none());
    }

    #[test]
    fn partial_file() {
        let path: PathBuf = temp_file(
            "partial.json",
            r#"{ "rooms": 30, "narrative": { "bested": "{name} lost in {year}" } }"#,
        );
        let settings: Settings = SettingsFile::new(path.clone()).get_settings().unwrap().unwrap();
        fs::remove_file(path).unwrap();

        assert_eq!(settings.rooms, 30);
        assert_eq!(settings.level, config::DEFAULT_LEVEL);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.narrative.bested, "{name} lost in {year}");
        assert_eq!(
            settings.narrative.felled,
            NarrativeTemplates::default().felled
        );
    }

    #[test]
    fn invalid_file() {
        let path: PathBuf = temp_file("invalid.json", "{ rooms: ");
        let ret = SettingsFile::new(path.clone()).get_settings();
        fs::remove_file(path).unwrap();
        assert!(ret.is_err());
    }
}
