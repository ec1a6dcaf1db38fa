/*
error.rs

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

//! Errors raised by the generators.
//!
//! Running out of candidates is never an error: the generators stop early and return a shorter
//! result. Only degenerate parameters are rejected.

use thiserror::Error;

/// Type of errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// The board is smaller than what the generator needs.
    #[error("board must be at least {min_width}x{min_height}, got {width}x{height}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },

    /// A partition needs at least one bucket.
    #[error("the number of buckets must be at least 1")]
    NoBuckets,

    /// A narrative template cannot be rendered.
    #[error("cannot render the narrative template: {0}")]
    Template(String),
}

/// Verify that a `width` x `height` board is at least `min_width` x `min_height`.
pub fn check_dimensions(
    width: usize,
    height: usize,
    min_width: usize,
    min_height: usize,
) -> Result<(), GeneratorError> {
    if width < min_width || height < min_height {
        return Err(GeneratorError::InvalidDimensions {
            width,
            height,
            min_width,
            min_height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions() {
        assert_eq!(check_dimensions(2, 2, 2, 2), Ok(()));
        let err: GeneratorError = check_dimensions(1, 3, 2, 2).unwrap_err();
        assert_eq!(err.to_string(), "board must be at least 2x2, got 1x3");
    }
}
