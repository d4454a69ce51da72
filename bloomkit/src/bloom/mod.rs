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

//! Bloom Filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was inserted, `contains()` will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for items never inserted
//! - **Fixed size**: `m` and `k` never change after construction
//! - **Insert-only**: items cannot be removed and the filter cannot be reset
//!
//! # Usage
//!
//! ```rust
//! use bloomkit::bloom::BloomFilterBuilder;
//!
//! // Size a filter for 1000 items with at most a 1% false positive bound
//! let mut filter = BloomFilterBuilder::with_accuracy(1000, 0.01).build()?;
//!
//! filter.insert("apple");
//! filter.insert("banana");
//! filter.insert(42_u64);
//!
//! assert!(filter.contains("apple")); // true - definitely inserted
//! assert!(!filter.contains("grape")); // false - never inserted (probably)
//!
//! println!("m = {} bits, k = {}", filter.m(), filter.k());
//! println!("FPR bound after {} items: {:.4}%", filter.n(), filter.p() * 100.0);
//! # Ok::<(), bloomkit::error::Error>(())
//! ```
//!
//! # Creating Filters
//!
//! ## By Accuracy (Recommended)
//!
//! [`planner::plan`] derives `m` and `k` so that the Goel-Gupta bound holds at capacity:
//!
//! ```rust
//! # use bloomkit::bloom::BloomFilterBuilder;
//! let filter = BloomFilterBuilder::with_accuracy(
//!     10_000, // Expected max items
//!     0.01,   // Target false positive bound (1%)
//! )
//! .build()?;
//! # Ok::<(), bloomkit::error::Error>(())
//! ```
//!
//! ## By Size (Manual)
//!
//! ```rust
//! # use bloomkit::bloom::BloomFilterBuilder;
//! # use bloomkit::hash::HashStrategy;
//! let filter = BloomFilterBuilder::with_size(
//!     95_851, // Number of bits
//!     7,      // Number of hash functions
//! )
//! .strategy(HashStrategy::SaltedDigest)
//! .build()?;
//! # Ok::<(), bloomkit::error::Error>(())
//! ```
//!
//! # Implementation Details
//!
//! - Hash functions come from a [`HashStrategy`](crate::hash::HashStrategy); the default
//!   double-hashes SHA-224 and SHA-256 (Kirsch-Mitzenmacher method)
//! - Bits are stored in a bounds-checked [`BitVector`](crate::common::BitVector)
//! - No internal synchronization: `insert` needs `&mut self`, queries only `&self`
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"
//! - Kirsch and Mitzenmacher (2008). "Less Hashing, Same Performance: Building a Better Bloom
//!   Filter"
//! - Goel and Gupta (2010). "Small subset queries and bloom filters using ternary associative
//!   memories, with applications"

mod builder;
mod filter;
pub mod planner;

pub use self::builder::BloomFilterBuilder;
pub use self::filter::BloomFilter;
pub use self::planner::FilterParams;
