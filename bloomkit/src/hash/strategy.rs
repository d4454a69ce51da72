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

use std::fmt;
use std::hash::Hash;

use sha2::Sha224;
use sha2::Sha256;

use super::digest::Magnitude;
use super::digest::digest_of;
use super::digest::identity_of;
use crate::hash::HashValue;

/// How a filter derives its `k` hash functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashStrategy {
    /// Every function is the identity on integer items, so all `k` positions coincide.
    ///
    /// Only useful to exercise the bit storage; do not rely on it for false-positive rates.
    Degenerate,
    /// Function `i` is SHA-256 over the item followed by the salt `-i`.
    SaltedDigest,
    /// Function `i` is `SHA-224(item) + i * SHA-256(item)`.
    ///
    /// Two digest computations per item regardless of `k`.
    #[default]
    ComposedDigest,
}

impl HashStrategy {
    /// Produces the `k` hash functions of this strategy, in index order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::hash::HashStrategy;
    /// let functions = HashStrategy::SaltedDigest.generate(3);
    /// assert_eq!(functions.len(), 3);
    /// assert_eq!(functions[2].index(), 2);
    /// ```
    pub fn generate(self, k: u16) -> Vec<HashFunction> {
        (0..k)
            .map(|index| HashFunction {
                strategy: self,
                index,
            })
            .collect()
    }

    /// Returns a stable name for this strategy.
    pub const fn name(self) -> &'static str {
        match self {
            HashStrategy::Degenerate => "degenerate",
            HashStrategy::SaltedDigest => "salted-digest",
            HashStrategy::ComposedDigest => "composed-digest",
        }
    }
}

impl fmt::Display for HashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the `k` hash functions of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashFunction {
    strategy: HashStrategy,
    index: u16,
}

impl HashFunction {
    /// Returns the strategy this function belongs to.
    pub fn strategy(&self) -> HashStrategy {
        self.strategy
    }

    /// Returns the position of this function within its strategy's sequence.
    pub fn index(&self) -> u16 {
        self.index
    }

    /// Maps `item` to a non-negative integer. Repeated calls yield the same value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::hash::HashStrategy;
    /// let functions = HashStrategy::ComposedDigest.generate(2);
    /// assert_eq!(functions[1].hash("apple"), functions[1].hash("apple"));
    /// assert_ne!(functions[0].hash("apple"), functions[1].hash("apple"));
    /// ```
    pub fn hash<T: Hash + ?Sized>(&self, item: &T) -> HashValue {
        self.hash_with(&mut ItemDigests::new(item))
    }

    /// Like [`hash`](Self::hash), reusing digests already computed for the item.
    pub(crate) fn hash_with<T: Hash + ?Sized>(
        &self,
        digests: &mut ItemDigests<'_, T>,
    ) -> HashValue {
        match self.strategy {
            HashStrategy::Degenerate => identity_of(digests.item),
            HashStrategy::SaltedDigest => {
                HashValue::from_digest(digest_of::<Sha256, _>(digests.item, Some(self.index)))
            }
            HashStrategy::ComposedDigest => {
                let (primary, secondary) = digests.composed();
                HashValue::composed(primary, u64::from(self.index), secondary)
            }
        }
    }
}

/// Digests of a single item, computed on first use and shared by all `k` functions.
pub(crate) struct ItemDigests<'a, T: ?Sized> {
    item: &'a T,
    composed: Option<(Magnitude, Magnitude)>,
}

impl<'a, T: Hash + ?Sized> ItemDigests<'a, T> {
    pub(crate) fn new(item: &'a T) -> Self {
        ItemDigests {
            item,
            composed: None,
        }
    }

    fn composed(&mut self) -> (Magnitude, Magnitude) {
        let item = self.item;
        *self.composed.get_or_insert_with(|| {
            (
                digest_of::<Sha224, _>(item, None),
                digest_of::<Sha256, _>(item, None),
            )
        })
    }
}
