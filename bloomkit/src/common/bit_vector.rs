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

use crate::error::Error;

/// A fixed-size vector of bits with bounds-checked access.
///
/// Bits are packed into `u64` words; the vector never grows after construction.
///
/// # Examples
///
/// ```
/// # use bloomkit::common::BitVector;
/// let mut bits = BitVector::new(10).unwrap();
/// bits.set(2).unwrap();
/// bits.set(6).unwrap();
/// assert!(bits.get(2).unwrap());
/// assert!(!bits.get(4).unwrap());
/// assert!(bits.get(10).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVector {
    size: u64,
    /// Length = ceil(size / 64)
    words: Box<[u64]>,
}

impl BitVector {
    /// Creates a vector of `size` bits, all clear.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
    /// `size` is 0.
    pub fn new(size: u64) -> Result<Self, Error> {
        if size == 0 {
            return Err(
                Error::invalid_argument("bit vector size must be greater than 0")
                    .with_context("size", size),
            );
        }

        let num_words = usize::try_from(size.div_ceil(64)).map_err(|_| {
            Error::invalid_argument("bit vector size exceeds addressable memory")
                .with_context("size", size)
        })?;

        Ok(BitVector {
            size,
            words: vec![0u64; num_words].into_boxed_slice(),
        })
    }

    /// Returns the number of addressable bits.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns whether no bit is set.
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Returns the number of bits set to 1.
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|word| u64::from(word.count_ones())).sum()
    }

    /// Reads the bit at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexOutOfRange`](crate::error::ErrorKind::IndexOutOfRange) if
    /// `index >= size()`.
    pub fn get(&self, index: u64) -> Result<bool, Error> {
        let (word, mask) = self.locate(index)?;
        Ok(self.words[word] & mask != 0)
    }

    /// Sets the bit at `index`. Setting an already-set bit is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexOutOfRange`](crate::error::ErrorKind::IndexOutOfRange) if
    /// `index >= size()`.
    pub fn set(&mut self, index: u64) -> Result<(), Error> {
        let (word, mask) = self.locate(index)?;
        self.words[word] |= mask;
        Ok(())
    }

    /// Clears the bit at `index`. Clearing an already-clear bit is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexOutOfRange`](crate::error::ErrorKind::IndexOutOfRange) if
    /// `index >= size()`.
    pub fn unset(&mut self, index: u64) -> Result<(), Error> {
        let (word, mask) = self.locate(index)?;
        self.words[word] &= !mask;
        Ok(())
    }

    /// Maps a bit index to its word position and in-word mask.
    fn locate(&self, index: u64) -> Result<(usize, u64), Error> {
        if index >= self.size {
            return Err(Error::index_out_of_range(index, self.size));
        }
        let word = (index >> 6) as usize; // Equivalent to index / 64
        let mask = 1u64 << (index & 63); // Equivalent to index % 64
        Ok((word, mask))
    }
}
