/*
config.rs

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

pub static COPYRIGHT_NOTICE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright 2025 Hervé Quatremain
License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>.
This is free software: you are free to change and redistribute it.
There is NO WARRANTY, to the extent permitted by law."
);

/// Default settings file, in the current directory.
pub static SETTINGS_FILE: &str = "temple-gen.json";

/// Number of room extensions.
pub const DEFAULT_ROOMS: usize = 12;

/// Level of the seed room.
pub const DEFAULT_LEVEL: usize = 5;

/// Knight graph expansions for the easiest rooms.
pub const KNIGHT_BASE_EXPANSIONS: usize = 2;

/// Largest garden, in plots.
pub const REST_MAX_WIDTH: usize = 5;
pub const REST_MAX_HEIGHT: usize = 3;
