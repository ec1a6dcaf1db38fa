/*
partition.rs

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

//! Split bead counts into buckets of three piles.
//!
//! Each bucket gets `3 * n` beads, where `n` is the number of buckets, split in three piles with
//! the stars-and-bars method: two distinct dividers are drawn among `3n + 2` slots.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::GeneratorError;

/// Bead piles, three per bucket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BeadPiles {
    /// Number of buckets.
    pub num_buckets: usize,

    /// Piles, grouped by bucket.
    pub piles: Vec<[usize; 3]>,
}

impl BeadPiles {
    /// Number of beads in each bucket.
    pub fn target(&self) -> usize {
        self.num_buckets * 3
    }

    /// All the piles, bucket after bucket.
    pub fn flatten(&self) -> Vec<usize> {
        self.piles.iter().flatten().copied().collect()
    }
}

/// [`PartitionGenerator`] object.
pub struct PartitionGenerator {
    num_buckets: usize,
}

impl PartitionGenerator {
    /// Create the object.
    ///
    /// # Errors
    ///
    /// Return an error when `num_buckets` is zero.
    pub fn new(num_buckets: usize) -> Result<Self, GeneratorError> {
        if num_buckets == 0 {
            return Err(GeneratorError::NoBuckets);
        }
        Ok(Self { num_buckets })
    }

    /// Generate the piles.
    pub fn generate(&self, rng: &mut impl Rng) -> BeadPiles {
        let each_sum: usize = self.num_buckets * 3;
        let mut piles: Vec<[usize; 3]> = Vec::with_capacity(self.num_buckets);

        for _ in 0..self.num_buckets {
            let divider_one: usize = rng.random_range(0..each_sum + 2);
            let mut divider_two: usize = rng.random_range(0..each_sum + 1);
            if divider_one == divider_two {
                divider_two += 1;
            }
            let (d0, d1) = if divider_one < divider_two {
                (divider_one, divider_two)
            } else {
                (divider_two, divider_one)
            };
            piles.push([d0, d1 - d0 - 1, each_sum + 1 - d1]);
        }
        debug!("Bead piles for {} buckets: {piles:?}", self.num_buckets);

        BeadPiles {
            num_buckets: self.num_buckets,
            piles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_buckets_is_rejected() {
        assert_eq!(PartitionGenerator::new(0).err(), Some(GeneratorError::NoBuckets));
    }

    #[test]
    fn every_bucket_sums_to_the_target() {
        for seed in 0..200 {
            let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(seed);
            let n: usize = (seed % 5 + 1) as usize;
            let beads: BeadPiles = PartitionGenerator::new(n).unwrap().generate(&mut rng);
            assert_eq!(beads.piles.len(), n);
            assert_eq!(beads.target(), 3 * n);
            for bucket in &beads.piles {
                assert_eq!(bucket.iter().sum::<usize>(), 3 * n, "bucket {bucket:?}");
            }
            assert_eq!(beads.flatten().len(), 3 * n);
        }
    }

    #[test]
    fn same_seed_same_piles() {
        let generator: PartitionGenerator = PartitionGenerator::new(2).unwrap();
        let a: BeadPiles = generator.generate(&mut ChaCha8Rng::seed_from_u64(7));
        let b: BeadPiles = generator.generate(&mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
