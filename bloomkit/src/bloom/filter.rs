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

use std::hash::Hash;

use log::warn;

use super::planner::approx_fpr;
use super::planner::fpr_bound;
use crate::common::BitVector;
use crate::hash::HashFunction;
use crate::hash::HashStrategy;
use crate::hash::ItemDigests;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - A false positive rate bounded by [`p()`](Self::p)
/// - Constant space usage
///
/// The filter is insert-only: bits are set by insertions and never cleared.
///
/// Use [`super::BloomFilterBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    /// Strategy the hash functions were generated from
    pub(super) strategy: HashStrategy,
    /// The k hash functions, in index order
    pub(super) hash_functions: Vec<HashFunction>,
    /// Bit storage of size m
    pub(super) bit_vector: BitVector,
    /// Number of insertions (n)
    pub(super) items_added: u64,
    /// Capacity the filter was planned for, if built by accuracy
    pub(super) capacity: Option<u64>,
}

impl BloomFilter {
    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    ///
    /// Stops at the first hash function whose bit is clear.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
    /// filter.insert("apple");
    ///
    /// assert!(filter.contains("apple"));
    /// assert!(!filter.contains("grape")); // never inserted (probably)
    /// ```
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        let mut digests = ItemDigests::new(item);
        self.first_clear_bit(&mut digests).is_none()
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    /// Digests are computed once for both steps.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
    ///
    /// assert!(!filter.contains_and_insert("apple")); // First insertion
    /// assert!(filter.contains_and_insert("apple")); // Now it's in the set
    /// assert_eq!(filter.n(), 2);
    /// ```
    pub fn contains_and_insert<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let mut digests = ItemDigests::new(item);
        let was_present = self.first_clear_bit(&mut digests).is_none();
        self.set_bits(&mut digests);
        self.record_insertion();
        was_present
    }

    /// Inserts an item into the filter.
    ///
    /// Sets the bit of every hash function (fewer than `k` distinct bits on collisions) and
    /// counts one insertion. After insertion, `contains(item)` always returns `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
    ///
    /// filter.insert("apple");
    /// filter.insert(42_u64);
    /// filter.insert([1, 2, 3]);
    ///
    /// assert!(filter.contains("apple"));
    /// assert_eq!(filter.n(), 3);
    /// ```
    pub fn insert<T: Hash>(&mut self, item: T) {
        let mut digests = ItemDigests::new(&item);
        self.set_bits(&mut digests);
        self.record_insertion();
    }

    /// Inserts every item in order, as if by repeated [`insert`](Self::insert).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.05).build().unwrap();
    /// filter.insert_all((0..10).map(|i| format!("hello{i}")));
    /// assert!(filter.contains("hello5"));
    /// assert_eq!(filter.n(), 10);
    /// ```
    pub fn insert_all<I>(&mut self, items: I)
    where
        I: IntoIterator,
        I::Item: Hash,
    {
        for item in items {
            self.insert(item);
        }
    }

    /// Returns the number of hash functions (k).
    pub fn k(&self) -> u16 {
        self.hash_functions.len() as u16
    }

    /// Returns the number of bits (m).
    pub fn m(&self) -> u64 {
        self.bit_vector.size()
    }

    /// Returns the number of insertions so far (n).
    ///
    /// Every insertion counts, including repeated items.
    pub fn n(&self) -> u64 {
        self.items_added
    }

    /// Returns the Goel-Gupta upper bound on the false positive probability for the current
    /// `k`, `n` and `m`.
    ///
    /// Recomputed on every call.
    pub fn p(&self) -> f64 {
        fpr_bound(self.k(), self.n(), self.m())
    }

    /// Returns the asymptotic approximation `(1 - exp(-k n / m))^k` of the false positive
    /// probability.
    pub fn approx_p(&self) -> f64 {
        approx_fpr(self.k(), self.n(), self.m())
    }

    /// Estimates the false positive probability from the observed bit saturation.
    ///
    /// Uses the approximation: `load_factor^k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powf(f64::from(self.k()))
    }

    /// Returns the capacity the filter was planned for.
    ///
    /// `None` for filters built from an explicit size. The capacity is informational:
    /// inserting more items is allowed but weakens the bound.
    pub fn capacity(&self) -> Option<u64> {
        self.capacity
    }

    /// Returns the hash strategy in use.
    pub fn strategy(&self) -> HashStrategy {
        self.strategy
    }

    /// Returns the hash functions in index order.
    pub fn hash_functions(&self) -> &[HashFunction] {
        &self.hash_functions
    }

    /// Returns whether no item has been inserted.
    pub fn is_empty(&self) -> bool {
        self.items_added == 0
    }

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.bit_vector.count_ones()
    }

    /// Returns the current load factor (fraction of bits set).
    pub fn load_factor(&self) -> f64 {
        self.bits_used() as f64 / self.m() as f64
    }

    fn record_insertion(&mut self) {
        self.items_added += 1;
        let previous = self.items_added - 1;
        if self.capacity == Some(previous) {
            warn!(
                "bloom filter exceeded its capacity of {previous} items; false positive bound is now {:.6}",
                self.p()
            );
        }
    }

    /// Returns the position of the first hash function whose bit is clear for the item.
    ///
    /// Functions after that position are never evaluated.
    fn first_clear_bit<T: Hash + ?Sized>(
        &self,
        digests: &mut ItemDigests<'_, T>,
    ) -> Option<usize> {
        let m = self.m();
        self.hash_functions.iter().position(|function| {
            let bit_index = function.hash_with(digests).reduce(m);
            match self.bit_vector.get(bit_index) {
                Ok(is_set) => !is_set,
                Err(err) => unreachable!("bit index reduced modulo m: {err}"),
            }
        })
    }

    /// Sets all k bits for the item.
    fn set_bits<T: Hash + ?Sized>(&mut self, digests: &mut ItemDigests<'_, T>) {
        let m = self.m();
        for function in &self.hash_functions {
            let bit_index = function.hash_with(digests).reduce(m);
            if let Err(err) = self.bit_vector.set(bit_index) {
                unreachable!("bit index reduced modulo m: {err}");
            }
        }
    }
}

impl<T: Hash> Extend<T> for BloomFilter {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::hash::Hash;
    use std::hash::Hasher;

    use crate::bloom::BloomFilterBuilder;
    use crate::hash::HashStrategy;
    use crate::hash::ItemDigests;

    #[test]
    fn test_builder_with_accuracy() {
        let filter = BloomFilterBuilder::with_accuracy(1000, 0.01).build().unwrap();
        assert_eq!(filter.m(), 9599);
        assert_eq!(filter.k(), 7);
        assert_eq!(filter.capacity(), Some(1000));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_builder_with_size() {
        let filter = BloomFilterBuilder::with_size(1024, 5).build().unwrap();
        assert_eq!(filter.m(), 1024);
        assert_eq!(filter.k(), 5);
        assert_eq!(filter.capacity(), None);
        assert_eq!(filter.hash_functions().len(), 5);
    }

    #[test]
    fn test_insert_and_contains() {
        let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();

        assert!(!filter.contains("apple"));
        filter.insert("apple");
        assert!(filter.contains("apple"));
        assert!(!filter.is_empty());
        assert_eq!(filter.n(), 1);
    }

    #[test]
    fn test_counter_increments_once_per_insert() {
        let mut filter = BloomFilterBuilder::with_size(64, 8).build().unwrap();
        filter.insert(1_u64);
        filter.insert(1_u64);
        assert_eq!(filter.n(), 2);
    }

    #[test]
    fn test_degenerate_sets_single_bit() {
        let mut filter = BloomFilterBuilder::with_size(20, 2)
            .strategy(HashStrategy::Degenerate)
            .build()
            .unwrap();
        filter.insert(15);
        filter.insert(41);
        assert_eq!(filter.bits_used(), 2);
        assert!(filter.contains(&15));
        assert!(filter.contains(&41));
        assert!(!filter.contains(&34));
        // 35 = 15 (mod 20)
        assert!(filter.contains(&35));
    }

    #[test]
    fn test_degenerate_negative_integers_wrap() {
        let mut filter = BloomFilterBuilder::with_size(20, 2)
            .strategy(HashStrategy::Degenerate)
            .build()
            .unwrap();
        filter.insert(-1);
        assert_eq!(filter.bits_used(), 1);
        assert!(filter.bit_vector.get(19).unwrap());
        assert!(filter.contains(&19));
        assert!(filter.contains(&-21_i64));
        assert!(!filter.contains(&1));

        filter.insert(1_u128 << 64);
        assert!(filter.bit_vector.get(16).unwrap());
        assert!(filter.contains(&36));
    }

    /// Counts how many times a hash function reads the item.
    struct CountingItem {
        value: u64,
        reads: Cell<usize>,
    }

    impl Hash for CountingItem {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.reads.set(self.reads.get() + 1);
            self.value.hash(state);
        }
    }

    #[test]
    fn test_contains_stops_at_first_clear_bit() {
        let mut filter = BloomFilterBuilder::with_size(1 << 16, 4)
            .strategy(HashStrategy::SaltedDigest)
            .build()
            .unwrap();
        let item = CountingItem {
            value: 7,
            reads: Cell::new(0),
        };

        // salted digests read the item once per evaluated function
        assert!(!filter.contains(&item));
        assert_eq!(item.reads.get(), 1);

        let m = filter.m();
        let indices: Vec<u64> = filter
            .hash_functions()
            .iter()
            .map(|function| function.hash(&item).reduce(m))
            .collect();
        filter.bit_vector.set(indices[0]).unwrap();
        filter.bit_vector.set(indices[1]).unwrap();
        let expected = indices
            .iter()
            .position(|index| *index != indices[0] && *index != indices[1]);

        item.reads.set(0);
        let mut digests = ItemDigests::new(&item);
        assert_eq!(filter.first_clear_bit(&mut digests), expected);
        let evaluated = expected.map_or(4, |position| position + 1);
        assert_eq!(item.reads.get(), evaluated);

        item.reads.set(0);
        filter.insert(&item);
        item.reads.set(0);
        assert!(filter.contains(&item));
        assert_eq!(item.reads.get(), 4);
    }

    #[test]
    fn test_contains_and_insert() {
        let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();

        let was_present = filter.contains_and_insert(&42_u64);
        assert!(!was_present);

        let was_present = filter.contains_and_insert(&42_u64);
        assert!(was_present);
        assert_eq!(filter.n(), 2);
    }

    #[test]
    fn test_extend() {
        let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
        filter.extend(["a", "b", "c"]);
        assert_eq!(filter.n(), 3);
        assert!(filter.contains("a"));
        assert!(filter.contains("c"));
    }

    #[test]
    fn test_statistics() {
        let mut filter = BloomFilterBuilder::with_size(1000, 5).build().unwrap();
        assert_eq!(filter.bits_used(), 0);
        assert_eq!(filter.load_factor(), 0.0);
        assert_eq!(filter.approx_p(), 0.0);

        filter.insert("test");
        assert!(filter.bits_used() > 0);
        assert!(filter.bits_used() <= 5);
        assert!(filter.load_factor() > 0.0);
        assert!(filter.estimated_fpp() > 0.0);
        assert!(filter.p() >= filter.approx_p());
    }

    #[test]
    fn test_p_grows_with_insertions() {
        let mut filter = BloomFilterBuilder::with_accuracy(10, 0.05).build().unwrap();
        let mut previous = filter.p();
        for i in 0..30 {
            filter.insert(i);
            let current = filter.p();
            assert!(current > previous);
            previous = current;
        }
        // past capacity the bound no longer holds
        assert!(filter.p() > 0.05);
    }
}
