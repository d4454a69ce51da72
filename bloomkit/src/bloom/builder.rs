// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use log::debug;

use super::BloomFilter;
use super::planner;
use super::planner::MAX_NUM_BITS;
use super::planner::MAX_NUM_HASHES;
use super::planner::MIN_NUM_HASHES;
use crate::common::BitVector;
use crate::error::Error;
use crate::hash::HashStrategy;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sizing {
    Size { num_bits: u64, num_hashes: u16 },
    Accuracy { capacity: u64, fpr: f64 },
}

/// Builder for creating [`BloomFilter`] instances.
///
/// Provides two construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify target capacity and false positive rate
///   (recommended)
/// - [`with_size()`](Self::with_size): Specify bit count and hash functions (manual)
///
/// Parameters are validated by [`build()`](Self::build).
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    sizing: Sizing,
    strategy: HashStrategy,
}

impl BloomFilterBuilder {
    /// Creates a builder that sizes the filter for a target accuracy.
    ///
    /// The bit count and number of hash functions are chosen by [`planner::plan`] so that the
    /// false positive bound stays at or below `fpr` until `capacity` items are inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_accuracy(10_000, 0.01).build().unwrap();
    /// assert!(filter.p() <= 0.01);
    /// ```
    pub fn with_accuracy(capacity: u64, fpr: f64) -> Self {
        BloomFilterBuilder {
            sizing: Sizing::Accuracy { capacity, fpr },
            strategy: HashStrategy::default(),
        }
    }

    /// Creates a builder with manual size specification.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_size(20, 2).build().unwrap();
    /// assert_eq!(filter.m(), 20);
    /// assert_eq!(filter.k(), 2);
    /// ```
    pub fn with_size(num_bits: u64, num_hashes: u16) -> Self {
        BloomFilterBuilder {
            sizing: Sizing::Size {
                num_bits,
                num_hashes,
            },
            strategy: HashStrategy::default(),
        }
    }

    /// Sets the hash strategy (default: [`HashStrategy::ComposedDigest`]).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilterBuilder;
    /// # use bloomkit::hash::HashStrategy;
    /// let filter = BloomFilterBuilder::with_accuracy(100, 0.01)
    ///     .strategy(HashStrategy::SaltedDigest)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(filter.strategy(), HashStrategy::SaltedDigest);
    /// ```
    pub fn strategy(mut self, strategy: HashStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if:
    /// - the bit count is 0 or exceeds [`MAX_NUM_BITS`]
    /// - the number of hash functions is 0 or exceeds [`MAX_NUM_HASHES`]
    /// - the capacity is 0 or the false positive rate is not strictly between 0 and 1
    ///
    /// # Panics
    ///
    /// Panics if the hash strategy does not produce exactly `k` functions.
    pub fn build(self) -> Result<BloomFilter, Error> {
        let (num_bits, num_hashes, capacity) = match self.sizing {
            Sizing::Size {
                num_bits,
                num_hashes,
            } => (num_bits, num_hashes, None),
            Sizing::Accuracy { capacity, fpr } => {
                let params = planner::plan(capacity, fpr)?;
                (params.num_bits, params.num_hashes, Some(capacity))
            }
        };

        if num_bits > MAX_NUM_BITS {
            return Err(
                Error::invalid_argument(format!("num_bits must not exceed {MAX_NUM_BITS}"))
                    .with_context("num_bits", num_bits),
            );
        }
        if !(MIN_NUM_HASHES..=MAX_NUM_HASHES).contains(&num_hashes) {
            return Err(Error::invalid_argument(format!(
                "num_hashes must be between {MIN_NUM_HASHES} and {MAX_NUM_HASHES}"
            ))
            .with_context("num_hashes", num_hashes));
        }

        let bit_vector = BitVector::new(num_bits)?;
        let hash_functions = self.strategy.generate(num_hashes);
        assert_eq!(
            hash_functions.len(),
            usize::from(num_hashes),
            "hash strategy {} must produce exactly {num_hashes} functions",
            self.strategy
        );

        debug!(
            "built bloom filter: m={num_bits}, k={num_hashes}, strategy={}, capacity={capacity:?}",
            self.strategy
        );
        Ok(BloomFilter {
            strategy: self.strategy,
            hash_functions,
            bit_vector,
            items_added: 0,
            capacity,
        })
    }
}
