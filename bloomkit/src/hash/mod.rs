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

//! Hash-function strategies that turn an item into the `k` bit positions of a filter.
//!
//! Every strategy hands out plain [`HashFunction`] values: a strategy tag plus the function's
//! index. Evaluating a function on an item yields a [`HashValue`], an integer of up to several
//! hundred bits which the filter reduces modulo its bit count.
//!
//! - [`HashStrategy::Degenerate`] maps integers to themselves, so `-1` lands on bit `m - 1`. It
//!   exists to exercise storage mechanics and gives no false-positive guarantees.
//! - [`HashStrategy::SaltedDigest`] runs SHA-256 once per function, salting the input with the
//!   function index.
//! - [`HashStrategy::ComposedDigest`] computes SHA-224 and SHA-256 once per item and combines
//!   them as `sha224 + i * sha256` (Kirsch-Mitzenmacher double hashing).
//!
//! Items are any [`Hash`](std::hash::Hash) type; the byte stream an item feeds to a
//! [`Hasher`](std::hash::Hasher) is what gets digested. Because the standard library hashes
//! integers in native byte order, digests are not guaranteed to match across platforms.

mod digest;
mod strategy;

pub use self::digest::HashValue;
pub(crate) use self::strategy::ItemDigests;
pub use self::strategy::HashFunction;
pub use self::strategy::HashStrategy;
