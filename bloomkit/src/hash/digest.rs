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
use std::hash::Hasher;

use byteorder::BigEndian;
use byteorder::ByteOrder;
use sha2::Digest;

/// Width in bytes of every digest magnitude; narrower digests are left-padded with zeros.
pub(crate) const DIGEST_BYTES: usize = 32;

/// A big-endian unsigned integer of [`DIGEST_BYTES`] bytes.
pub(crate) type Magnitude = [u8; DIGEST_BYTES];

/// The integer a hash function maps an item to, before reduction modulo the bit count.
///
/// The value is kept exactly as `base + multiplier * step`, which covers every strategy:
/// single digests have a zero multiplier, double hashing uses the function index as the
/// multiplier. Only identity values of signed integers carry a sign, which applies to `base`.
/// [`reduce`](Self::reduce) computes the residue without big-integer arithmetic.
///
/// # Examples
///
/// ```
/// # use bloomkit::hash::HashStrategy;
/// let functions = HashStrategy::Degenerate.generate(1);
/// assert_eq!(functions[0].hash(&41_u64).reduce(20), 1);
/// assert_eq!(functions[0].hash(&-1_i32).reduce(20), 19);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashValue {
    negative: bool,
    base: Magnitude,
    multiplier: u64,
    step: Magnitude,
}

impl HashValue {
    #[cfg(test)]
    pub(crate) fn from_u64(value: u64) -> Self {
        Self::from_integer(false, u128::from(value))
    }

    /// An integer given by its sign and magnitude.
    pub(crate) fn from_integer(negative: bool, magnitude: u128) -> Self {
        let mut base = [0u8; DIGEST_BYTES];
        BigEndian::write_u128(&mut base[DIGEST_BYTES - 16..], magnitude);
        HashValue {
            negative: negative && magnitude != 0,
            ..Self::from_digest(base)
        }
    }

    pub(crate) fn from_digest(base: Magnitude) -> Self {
        HashValue {
            negative: false,
            base,
            multiplier: 0,
            step: [0u8; DIGEST_BYTES],
        }
    }

    pub(crate) fn composed(base: Magnitude, multiplier: u64, step: Magnitude) -> Self {
        HashValue {
            negative: false,
            base,
            multiplier,
            step,
        }
    }

    /// Returns `self mod modulus`, always in `0..modulus`.
    ///
    /// Negative values reduce to the Euclidean residue, so `-1 mod 20` is 19.
    ///
    /// # Panics
    ///
    /// Panics if `modulus` is 0.
    pub fn reduce(&self, modulus: u64) -> u64 {
        assert!(modulus > 0, "modulus must be greater than 0");
        let m = u128::from(modulus);

        let mut base = residue(&self.base, modulus);
        if self.negative && base != 0 {
            base = modulus - base;
        }
        if self.multiplier == 0 {
            return base;
        }

        let step = u128::from(residue(&self.step, modulus));
        let scaled = u128::from(self.multiplier % modulus) * step % m;
        ((u128::from(base) + scaled) % m) as u64
    }
}

/// Residue of a big-endian magnitude, folded one 64-bit word at a time.
///
/// The accumulator stays below `modulus`, so `acc * 2^64 + word` never exceeds `u128::MAX`.
fn residue(magnitude: &Magnitude, modulus: u64) -> u64 {
    let m = u128::from(modulus);
    magnitude
        .chunks_exact(8)
        .fold(0u128, |acc, chunk| {
            ((acc << 64) | u128::from(BigEndian::read_u64(chunk))) % m
        }) as u64
}

/// Adapts a cryptographic digest to [`Hasher`] so that any [`Hash`] item can be digested.
struct DigestWriter<D>(D);

impl<D: Digest + Clone> Hasher for DigestWriter<D> {
    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finish(&self) -> u64 {
        BigEndian::read_u64(&self.0.clone().finalize()[..8])
    }
}

impl<D: Digest> DigestWriter<D> {
    fn into_magnitude(self) -> Magnitude {
        let output = self.0.finalize();
        let mut magnitude = [0u8; DIGEST_BYTES];
        magnitude[DIGEST_BYTES - output.len()..].copy_from_slice(&output);
        magnitude
    }
}

/// Digests `item` with `D`, optionally salted with `-<salt>` after the item bytes.
pub(crate) fn digest_of<D, T>(item: &T, salt: Option<u16>) -> Magnitude
where
    D: Digest + Clone,
    T: Hash + ?Sized,
{
    let mut writer = DigestWriter(D::new());
    item.hash(&mut writer);
    if let Some(salt) = salt {
        writer.write(b"-");
        writer.write(salt.to_string().as_bytes());
    }
    writer.into_magnitude()
}

/// A hasher that maps an integer to itself.
///
/// Integers keep their sign and full width, so a single integer written to an empty hasher
/// comes out as exactly that integer. Byte streams and multi-integer items fold into the
/// magnitude and stay deterministic, with no further meaning.
#[derive(Debug, Default)]
pub(crate) struct IdentityHasher {
    negative: bool,
    magnitude: u128,
}

impl IdentityHasher {
    fn fold(&mut self, negative: bool, magnitude: u128) {
        self.negative ^= negative;
        self.magnitude = self.magnitude.rotate_left(64) ^ magnitude;
    }

    fn fold_signed(&mut self, i: i128) {
        self.fold(i < 0, i.unsigned_abs());
    }

    fn value(&self) -> HashValue {
        HashValue::from_integer(self.negative, self.magnitude)
    }
}

impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.magnitude = self.magnitude.rotate_left(8) ^ u128::from(byte);
        }
    }

    fn write_u8(&mut self, i: u8) {
        self.fold(false, u128::from(i));
    }

    fn write_u16(&mut self, i: u16) {
        self.fold(false, u128::from(i));
    }

    fn write_u32(&mut self, i: u32) {
        self.fold(false, u128::from(i));
    }

    fn write_u64(&mut self, i: u64) {
        self.fold(false, u128::from(i));
    }

    fn write_u128(&mut self, i: u128) {
        self.fold(false, i);
    }

    fn write_usize(&mut self, i: usize) {
        self.fold(false, i as u128);
    }

    fn write_i8(&mut self, i: i8) {
        self.fold_signed(i128::from(i));
    }

    fn write_i16(&mut self, i: i16) {
        self.fold_signed(i128::from(i));
    }

    fn write_i32(&mut self, i: i32) {
        self.fold_signed(i128::from(i));
    }

    fn write_i64(&mut self, i: i64) {
        self.fold_signed(i128::from(i));
    }

    fn write_i128(&mut self, i: i128) {
        self.fold(i < 0, i.unsigned_abs());
    }

    fn write_isize(&mut self, i: isize) {
        self.fold_signed(i as i128);
    }

    fn finish(&self) -> u64 {
        self.magnitude as u64
    }
}

pub(crate) fn identity_of<T: Hash + ?Sized>(item: &T) -> HashValue {
    let mut hasher = IdentityHasher::default();
    item.hash(&mut hasher);
    hasher.value()
}
